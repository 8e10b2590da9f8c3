//! Data store abstraction over the `users` and `events` relations.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Event, User};

/// Read-only access to the two input relations.
///
/// Implementations return `Error::StorageUnavailable` when the backing
/// store cannot be read and `Error::SchemaMismatch` when its columns do not
/// match the contract in [`crate::schema`].
#[async_trait]
pub trait DataStore: Send + Sync {
    /// All users, in store order.
    async fn all_users(&self) -> Result<Vec<User>>;

    /// All events, in store order.
    async fn all_events(&self) -> Result<Vec<Event>>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

/// Store holding both relations in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Vec<User>,
    events: Vec<Event>,
}

impl MemoryStore {
    pub fn new(users: Vec<User>, events: Vec<Event>) -> Self {
        Self { users, events }
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn all_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }

    async fn all_events(&self) -> Result<Vec<Event>> {
        Ok(self.events.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
