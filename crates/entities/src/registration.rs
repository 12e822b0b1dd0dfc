//! Registration log entity definitions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::Program;

/// Audit trail row written once per successful registration.
///
/// The log is append-only and independent of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationLogEntry {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
    /// Registrant's name.
    pub name: String,
    /// Registrant's email.
    pub email: String,
    /// Program chosen at registration.
    pub program: Program,
}

impl RegistrationLogEntry {
    /// Log column order, also the header row of the log file.
    pub const COLUMNS: [&'static str; 5] = ["date", "time", "name", "email", "program"];

    /// Creates an entry stamped with the given local time.
    pub fn new(
        at: NaiveDateTime,
        name: impl Into<String>,
        email: impl Into<String>,
        program: Program,
    ) -> Self {
        Self {
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M:%S").to_string(),
            name: name.into(),
            email: email.into(),
            program,
        }
    }
}
