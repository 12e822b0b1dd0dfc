//! CSV file record store implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use entities::{RegistrationLogEntry, UserRecord};
use tokio::sync::Mutex;

use crate::{credit_points, table, RecordStore, StoreResult};

/// Record store backed by two CSV files on local disk.
///
/// Each operation is a full read-modify-write of one file. Operations are
/// serialized by a process-wide mutex, so updates from the same process are
/// never lost; other processes writing the same files are not coordinated.
#[derive(Debug)]
pub struct CsvRecordStore {
    ledger_path: PathBuf,
    log_path: PathBuf,
    io_lock: Mutex<()>,
}

impl CsvRecordStore {
    /// Creates a store over the given ledger and registration log files.
    pub fn new(ledger_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            ledger_path: ledger_path.into(),
            log_path: log_path.into(),
            io_lock: Mutex::new(()),
        }
    }

    /// Returns the ledger file path.
    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    /// Returns the registration log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Creates both files with their header rows if they do not exist yet.
    ///
    /// Existing files are read, so malformed content surfaces here.
    pub async fn ensure_files(&self) -> StoreResult<()> {
        let _guard = self.io_lock.lock().await;
        table::load::<UserRecord>(&self.ledger_path, &UserRecord::COLUMNS).await?;
        table::load::<RegistrationLogEntry>(&self.log_path, &RegistrationLogEntry::COLUMNS)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        let _guard = self.io_lock.lock().await;
        table::load(&self.ledger_path, &UserRecord::COLUMNS).await
    }

    async fn append_user(&self, user: UserRecord) -> StoreResult<()> {
        let _guard = self.io_lock.lock().await;
        let mut users: Vec<UserRecord> =
            table::load(&self.ledger_path, &UserRecord::COLUMNS).await?;
        let id = user.id;
        users.push(user);
        table::save(&self.ledger_path, &UserRecord::COLUMNS, &users).await?;

        tracing::debug!(user_id = id, rows = users.len(), "Ledger rewritten");
        Ok(())
    }

    async fn update_points(&self, email: &str, delta: u64) -> StoreResult<usize> {
        let _guard = self.io_lock.lock().await;
        let mut users: Vec<UserRecord> =
            table::load(&self.ledger_path, &UserRecord::COLUMNS).await?;

        let credited = credit_points(&mut users, email, delta);
        if credited > 0 {
            table::save(&self.ledger_path, &UserRecord::COLUMNS, &users).await?;
            tracing::debug!(credited, rows = users.len(), "Ledger rewritten");
        }

        Ok(credited)
    }

    async fn list_registrations(&self) -> StoreResult<Vec<RegistrationLogEntry>> {
        let _guard = self.io_lock.lock().await;
        table::load(&self.log_path, &RegistrationLogEntry::COLUMNS).await
    }

    async fn append_registration(&self, entry: RegistrationLogEntry) -> StoreResult<()> {
        let _guard = self.io_lock.lock().await;
        let mut entries: Vec<RegistrationLogEntry> =
            table::load(&self.log_path, &RegistrationLogEntry::COLUMNS).await?;
        entries.push(entry);
        table::save(&self.log_path, &RegistrationLogEntry::COLUMNS, &entries).await?;

        tracing::debug!(rows = entries.len(), "Registration log rewritten");
        Ok(())
    }
}
