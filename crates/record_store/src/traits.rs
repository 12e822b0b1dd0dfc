//! Record store trait definitions.

use async_trait::async_trait;
use entities::{RegistrationLogEntry, UserRecord};

use crate::{table, StoreResult};

/// Trait for ledger and registration log storage operations.
///
/// Every call observes the persisted state afresh; implementations keep no
/// cache between calls.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // =========================================================================
    // Ledger operations
    // =========================================================================

    /// Loads every ledger row, in file order.
    async fn list_users(&self) -> StoreResult<Vec<UserRecord>>;

    /// Appends one row to the ledger.
    async fn append_user(&self, user: UserRecord) -> StoreResult<()>;

    /// Adds `delta` points to every row whose email equals `email` exactly.
    ///
    /// Returns the number of rows credited. Nothing is written when it is 0.
    async fn update_points(&self, email: &str, delta: u64) -> StoreResult<usize>;

    /// Serializes the current ledger to its CSV form.
    async fn export_users(&self) -> StoreResult<Vec<u8>> {
        let users = self.list_users().await?;
        table::encode_rows(&UserRecord::COLUMNS, &users)
    }

    // =========================================================================
    // Registration log operations
    // =========================================================================

    /// Loads every registration log entry, in file order.
    async fn list_registrations(&self) -> StoreResult<Vec<RegistrationLogEntry>>;

    /// Appends one entry to the registration log.
    async fn append_registration(&self, entry: RegistrationLogEntry) -> StoreResult<()>;

    /// Serializes the current registration log to its CSV form.
    async fn export_registrations(&self) -> StoreResult<Vec<u8>> {
        let entries = self.list_registrations().await?;
        table::encode_rows(&RegistrationLogEntry::COLUMNS, &entries)
    }
}

/// Credits `delta` points to each user whose email matches exactly.
///
/// Balances saturate at `u64::MAX`. Returns the number of users credited.
pub fn credit_points(users: &mut [UserRecord], email: &str, delta: u64) -> usize {
    let mut credited = 0;
    for user in users.iter_mut().filter(|u| u.email == email) {
        user.points = user.points.saturating_add(delta);
        credited += 1;
    }
    credited
}
