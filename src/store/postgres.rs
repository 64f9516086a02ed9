// Thin sqlx-backed implementations of the record-access seams. Query
// semantics beyond single-statement reads/writes stay in Postgres.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AttendanceRecord, User, UserUpdate, ValidAttendance};

use super::{AttendanceStore, EventStore, StoreError, UserStore};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UserUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                role = COALESCE($3, role), \
                email = COALESCE($4, email), \
                updated_at = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.role)
        .bind(changes.email)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[derive(Clone)]
pub struct PgAttendanceStore {
    pool: PgPool,
}

impl PgAttendanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for PgAttendanceStore {
    async fn create(
        &self,
        record: ValidAttendance,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, StoreError> {
        let created = sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance \
                (user_id, event_id, attendance_date, status, reason, verified_by, \
                 remarks, check_in_time, check_out_time, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) \
             RETURNING *",
        )
        .bind(record.user_id)
        .bind(record.event_id)
        .bind(record.attendance_date)
        .bind(record.status)
        .bind(record.reason)
        .bind(record.verified_by)
        .bind(record.remarks)
        .bind(record.check_in_time)
        .bind(record.check_out_time)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get(&self, id: i32) -> Result<Option<AttendanceRecord>, StoreError> {
        let record = sqlx::query_as::<_, AttendanceRecord>("SELECT * FROM attendance WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn update(
        &self,
        id: i32,
        record: ValidAttendance,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        // Single-statement write: concurrent updates resolve last-write-wins.
        let updated = sqlx::query_as::<_, AttendanceRecord>(
            "UPDATE attendance SET \
                status = $2, reason = $3, remarks = $4, \
                check_in_time = $5, check_out_time = $6, updated_at = $7 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(record.status)
        .bind(record.reason)
        .bind(record.remarks)
        .bind(record.check_in_time)
        .bind(record.check_out_time)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }
}
