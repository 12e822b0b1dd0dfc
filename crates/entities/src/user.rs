//! Ledger user entity definitions.

use serde::{Deserialize, Serialize};

use crate::Program;

/// A registered member and their point balance (one ledger row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Sequential identifier, embedded in the QR lookup URL.
    pub id: u64,
    /// Full name.
    pub name: String,
    /// Email address, compared case-sensitively.
    pub email: String,
    /// Program chosen at registration.
    pub program: Program,
    /// Accumulated points.
    #[serde(default)]
    pub points: u64,
}

impl UserRecord {
    /// Ledger column order, also the header row of the ledger file.
    pub const COLUMNS: [&'static str; 5] = ["id", "name", "email", "program", "points"];

    /// Creates a new record with a zero balance.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        email: impl Into<String>,
        program: Program,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            program,
            points: 0,
        }
    }

    /// Sets the point balance.
    pub fn with_points(mut self, points: u64) -> Self {
        self.points = points;
        self
    }
}

/// Returns the identifier the next registration receives.
///
/// One past the largest existing id, or 1 for an empty ledger. Returns
/// `None` once the largest id is `u64::MAX`.
pub fn next_user_id(users: &[UserRecord]) -> Option<u64> {
    match users.iter().map(|u| u.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}
