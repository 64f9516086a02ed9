// Attendance submission and update. Structural rules come from the
// attendance validator; the referential halves of the invariants (user
// and event existence) are checked here against the stores, and both
// kinds are reported together in one violation list.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::dispatch::{Envelope, Handler, Payload, RequestContext};
use crate::error::ApiError;
use crate::models::AttendanceSubmission;
use crate::state::AppState;
use crate::store::{AttendanceStore, EventStore, UserStore};
use crate::validation::{validate_submission, RuleViolation};

fn parse_body<T: serde::de::DeserializeOwned>(data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data)
        .map_err(|e| ApiError::bad_request(format!("Invalid attendance payload: {}", e)))
}

fn unexpected_payload(handler: &'static str, payload: &Payload) -> ApiError {
    tracing::error!(handler, payload = payload.kind(), "payload does not match handler");
    ApiError::internal("Request was routed with a mismatched payload")
}

async fn referential_violations(
    state: &AppState,
    submission: &AttendanceSubmission,
) -> Result<Vec<RuleViolation>, ApiError> {
    let mut violations = Vec::new();

    if let Some(Ok(user_id)) = submission.user_id.as_deref().map(Uuid::parse_str) {
        if !state.users.exists(user_id).await? {
            violations.push(RuleViolation::unknown_reference(
                "userId",
                format!("user '{}' does not exist", user_id),
            ));
        }
    }

    if let Some(event_id) = submission.event_id {
        if !state.events.exists(event_id).await? {
            violations.push(RuleViolation::unknown_reference(
                "eventId",
                format!("event '{}' does not exist", event_id),
            ));
        }
    }

    Ok(violations)
}

pub struct SubmitAttendance;

#[async_trait]
impl Handler for SubmitAttendance {
    fn name(&self) -> &'static str {
        "attendance.submit"
    }

    async fn handle(
        &self,
        state: &AppState,
        envelope: Envelope,
        ctx: &RequestContext,
    ) -> Result<Value, ApiError> {
        let data = match envelope.payload {
            Payload::AttendanceSubmit { data } => data,
            other => return Err(unexpected_payload(self.name(), &other)),
        };

        let submission: AttendanceSubmission = parse_body(data)?;

        let (valid, mut violations) = match validate_submission(&submission) {
            Ok(valid) => (Some(valid), Vec::new()),
            Err(violations) => (None, violations),
        };
        violations.extend(referential_violations(state, &submission).await?);

        if !violations.is_empty() {
            return Err(ApiError::validation(violations));
        }
        let valid = valid.ok_or_else(|| ApiError::internal("Validation produced no record"))?;

        let record = state.attendance.create(valid, Utc::now()).await?;
        tracing::info!(
            id = record.id,
            user_id = %record.user_id,
            actor = %ctx.identity.user_id,
            "attendance recorded"
        );
        Ok(serde_json::to_value(record)?)
    }
}

/// Fields an attendance PATCH may change (status, times, remarks,
/// reason). Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceChanges {
    pub status: Option<String>,
    pub reason: Option<String>,
    pub remarks: Option<String>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
}

pub struct UpdateAttendance;

#[async_trait]
impl Handler for UpdateAttendance {
    fn name(&self) -> &'static str {
        "attendance.update"
    }

    async fn handle(
        &self,
        state: &AppState,
        envelope: Envelope,
        ctx: &RequestContext,
    ) -> Result<Value, ApiError> {
        let (raw_id, data) = match envelope.payload {
            Payload::AttendanceUpdate { id, data } => (id, data),
            other => return Err(unexpected_payload(self.name(), &other)),
        };

        let id: i32 = raw_id
            .parse()
            .map_err(|_| ApiError::not_found(format!("Attendance record '{}' not found", raw_id)))?;
        let existing = state
            .attendance
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Attendance record '{}' not found", id)))?;

        let changes: AttendanceChanges = parse_body(data)?;

        // Merge onto the stored record and revalidate the whole, so a
        // patch cannot leave the record violating any invariant.
        let mut merged = existing.as_submission();
        if changes.status.is_some() {
            merged.status = changes.status;
        }
        if changes.reason.is_some() {
            merged.reason = changes.reason;
        }
        if changes.remarks.is_some() {
            merged.remarks = changes.remarks;
        }
        if changes.check_in_time.is_some() {
            merged.check_in_time = changes.check_in_time;
        }
        if changes.check_out_time.is_some() {
            merged.check_out_time = changes.check_out_time;
        }

        let valid = validate_submission(&merged).map_err(ApiError::validation)?;

        let updated = state
            .attendance
            .update(id, valid, Utc::now())
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Attendance record '{}' not found", id)))?;

        tracing::info!(id, actor = %ctx.identity.user_id, "attendance updated");
        Ok(serde_json::to_value(updated)?)
    }
}
