//! In-memory record store implementation for testing.

use std::sync::Arc;

use async_trait::async_trait;
use entities::{RegistrationLogEntry, UserRecord};
use tokio::sync::RwLock;

use crate::{credit_points, RecordStore, StoreResult};

/// In-memory record store for testing purposes.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecordStore {
    users: Arc<RwLock<Vec<UserRecord>>>,
    registrations: Arc<RwLock<Vec<RegistrationLogEntry>>>,
}

impl MemoryRecordStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose ledger starts with `users`.
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
            ..Self::default()
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.users.read().await.clone())
    }

    async fn append_user(&self, user: UserRecord) -> StoreResult<()> {
        self.users.write().await.push(user);
        Ok(())
    }

    async fn update_points(&self, email: &str, delta: u64) -> StoreResult<usize> {
        let mut users = self.users.write().await;
        Ok(credit_points(&mut users, email, delta))
    }

    async fn list_registrations(&self) -> StoreResult<Vec<RegistrationLogEntry>> {
        Ok(self.registrations.read().await.clone())
    }

    async fn append_registration(&self, entry: RegistrationLogEntry) -> StoreResult<()> {
        self.registrations.write().await.push(entry);
        Ok(())
    }
}
