// In-memory stores for tests and database-less local runs. Writes swap
// whole records under a write lock, matching the last-write-wins policy
// the dispatch layer assumes of its storage collaborator.
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AttendanceRecord, Role, User, UserUpdate, ValidAttendance};

use super::{AttendanceStore, EventStore, StoreError, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Seed a user with fresh timestamps, returning the generated id.
    pub async fn seed(&self, name: &str, role: Role, email: &str) -> Uuid {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            role,
            email: email.to_string(),
            password: String::new(),
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        self.insert(user).await;
        id
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.users.read().await.contains_key(&id))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UserUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        user.updated_at = updated_at;
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut users = self.users.write().await;
        let count = users.len() as u64;
        users.clear();
        Ok(count)
    }
}

#[derive(Default)]
pub struct MemoryEventStore {
    ids: RwLock<HashSet<i32>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: i32) {
        self.ids.write().await.insert(id);
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.ids.read().await.contains(&id))
    }
}

#[derive(Default)]
pub struct MemoryAttendanceStore {
    inner: RwLock<AttendanceInner>,
}

#[derive(Default)]
struct AttendanceInner {
    next_id: i32,
    records: HashMap<i32, AttendanceRecord>,
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn create(
        &self,
        record: ValidAttendance,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let created = AttendanceRecord {
            id: inner.next_id,
            user_id: record.user_id,
            event_id: record.event_id,
            attendance_date: record.attendance_date,
            status: record.status,
            reason: record.reason,
            verified_by: record.verified_by,
            remarks: record.remarks,
            check_in_time: record.check_in_time,
            check_out_time: record.check_out_time,
            created_at: now,
            updated_at: now,
        };
        inner.records.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i32) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn update(
        &self,
        id: i32,
        record: ValidAttendance,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.records.get_mut(&id) else {
            return Ok(None);
        };
        existing.status = record.status;
        existing.reason = record.reason;
        existing.remarks = record.remarks;
        existing.check_in_time = record.check_in_time;
        existing.check_out_time = record.check_out_time;
        existing.updated_at = updated_at;
        Ok(Some(existing.clone()))
    }
}
