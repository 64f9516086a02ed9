// Record-access seams. The storage engine is an external collaborator:
// this layer only names the operations it needs and delegates query
// execution and write-conflict handling (last-write-wins, see DESIGN.md)
// to the implementation behind the trait.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{AttendanceRecord, User, UserUpdate, ValidAttendance};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryAttendanceStore, MemoryEventStore, MemoryUserStore};
pub use postgres::{PgAttendanceStore, PgEventStore, PgUserStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Apply the changes and the caller-supplied `updated_at` as one
    /// logical write. Returns `None` when the id does not resolve.
    async fn update(
        &self,
        id: Uuid,
        changes: UserUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn delete_all(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn exists(&self, id: i32) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Persist a validated submission, generating the id and stamping
    /// both system timestamps with `now`.
    async fn create(
        &self,
        record: ValidAttendance,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, StoreError>;

    async fn get(&self, id: i32) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Replace the mutable fields of an existing record and refresh
    /// `updated_at`. Returns `None` when the id does not resolve.
    async fn update(
        &self,
        id: i32,
        record: ValidAttendance,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<AttendanceRecord>, StoreError>;
}
