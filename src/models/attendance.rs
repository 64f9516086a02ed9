use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Attendance outcome vocabulary. The canonical values are `In`/`Out`;
/// `Present`/`Absent` are accepted as submission aliases and normalized
/// on parse (see DESIGN.md). Serialization always emits the canonical
/// spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attendance_status")]
pub enum AttendanceStatus {
    In,
    Out,
}

impl AttendanceStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "In" | "Present" => Some(AttendanceStatus::In),
            "Out" | "Absent" => Some(AttendanceStatus::Out),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::In => "In",
            AttendanceStatus::Out => "Out",
        }
    }
}

/// One user's presence outcome for one calendar date, optionally scoped
/// to an event. `event_id` absent means a daily (non-event) entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: i32,
    pub user_id: Uuid,
    pub event_id: Option<i32>,
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
    pub reason: Option<String>,
    pub verified_by: String,
    pub remarks: Option<String>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw attendance submission as it arrives on the wire. Everything is
/// optional here so the validator can report every missing or malformed
/// field at once instead of failing on the first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSubmission {
    pub user_id: Option<String>,
    pub event_id: Option<i32>,
    pub attendance_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub verified_by: Option<String>,
    pub remarks: Option<String>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
}

/// Submission that has passed structural validation. Referential checks
/// (user/event existence) happen in the handler against the stores.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidAttendance {
    pub user_id: Uuid,
    pub event_id: Option<i32>,
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
    pub reason: Option<String>,
    pub verified_by: String,
    pub remarks: Option<String>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// Re-project the stored record as a submission so a partial update
    /// can be merged and revalidated as a whole.
    pub fn as_submission(&self) -> AttendanceSubmission {
        AttendanceSubmission {
            user_id: Some(self.user_id.to_string()),
            event_id: self.event_id,
            attendance_date: Some(self.attendance_date),
            status: Some(self.status.as_str().to_string()),
            reason: self.reason.clone(),
            verified_by: Some(self.verified_by.clone()),
            remarks: self.remarks.clone(),
            check_in_time: self.check_in_time,
            check_out_time: self.check_out_time,
        }
    }
}
