use serde::Serialize;
use uuid::Uuid;

use crate::models::{AttendanceStatus, AttendanceSubmission, ValidAttendance};

/// Minimum length for the verifier identity.
pub const VERIFIED_BY_MIN_LEN: usize = 4;

/// A single violated attendance rule. The `kind` tag lets callers tell a
/// missing field from a bad value from a temporal ordering problem, each
/// of which implies a different user-facing fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleViolation {
    MissingField {
        field: &'static str,
        message: String,
    },
    InvalidValue {
        field: &'static str,
        message: String,
    },
    TooShort {
        field: &'static str,
        min: usize,
        message: String,
    },
    TemporalOrder {
        message: String,
    },
    UnknownReference {
        field: &'static str,
        message: String,
    },
}

impl RuleViolation {
    pub fn missing(field: &'static str) -> Self {
        RuleViolation::MissingField {
            field,
            message: format!("{} must be provided", field),
        }
    }

    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        RuleViolation::InvalidValue {
            field,
            message: message.into(),
        }
    }

    pub fn unknown_reference(field: &'static str, message: impl Into<String>) -> Self {
        RuleViolation::UnknownReference {
            field,
            message: message.into(),
        }
    }
}

/// Check a raw attendance submission against the structural and temporal
/// rules. Every violated rule is reported; rule order never changes the
/// outcome. Referential existence checks are the caller's job since they
/// need the stores.
pub fn validate_submission(
    submission: &AttendanceSubmission,
) -> Result<ValidAttendance, Vec<RuleViolation>> {
    let mut violations = Vec::new();

    let user_id = match submission.user_id.as_deref() {
        None | Some("") => {
            violations.push(RuleViolation::missing("userId"));
            None
        }
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                violations.push(RuleViolation::invalid(
                    "userId",
                    format!("'{}' is not a valid user identifier", raw),
                ));
                None
            }
        },
    };

    let attendance_date = match submission.attendance_date {
        Some(date) => Some(date),
        None => {
            violations.push(RuleViolation::missing("attendanceDate"));
            None
        }
    };

    let status = match submission.status.as_deref() {
        None | Some("") => {
            violations.push(RuleViolation::missing("status"));
            None
        }
        Some(raw) => match AttendanceStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                violations.push(RuleViolation::invalid(
                    "status",
                    format!("'{}' is not an allowed status (In, Out, Present, Absent)", raw),
                ));
                None
            }
        },
    };

    let verified_by = match submission.verified_by.as_deref() {
        None | Some("") => {
            violations.push(RuleViolation::missing("verifiedBy"));
            None
        }
        Some(raw) if raw.chars().count() < VERIFIED_BY_MIN_LEN => {
            violations.push(RuleViolation::TooShort {
                field: "verifiedBy",
                min: VERIFIED_BY_MIN_LEN,
                message: format!(
                    "verifiedBy must be at least {} characters",
                    VERIFIED_BY_MIN_LEN
                ),
            });
            None
        }
        Some(raw) => Some(raw.to_string()),
    };

    // Only meaningful when both timestamps are present.
    if let (Some(check_in), Some(check_out)) =
        (submission.check_in_time, submission.check_out_time)
    {
        if check_in > check_out {
            violations.push(RuleViolation::TemporalOrder {
                message: "checkInTime must not be later than checkOutTime".to_string(),
            });
        }
    }

    match (user_id, attendance_date, status, verified_by) {
        (Some(user_id), Some(attendance_date), Some(status), Some(verified_by))
            if violations.is_empty() =>
        {
            Ok(ValidAttendance {
                user_id,
                event_id: submission.event_id,
                attendance_date,
                status,
                reason: submission.reason.clone(),
                verified_by,
                remarks: submission.remarks.clone(),
                check_in_time: submission.check_in_time,
                check_out_time: submission.check_out_time,
            })
        }
        _ => Err(violations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn good_submission() -> AttendanceSubmission {
        AttendanceSubmission {
            user_id: Some("f3b5d0b4-9c5e-4e8e-a8a3-1a2b3c4d5e6f".into()),
            attendance_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            status: Some("In".into()),
            verified_by: Some("mgr1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_minimal_well_formed_submission() {
        let valid = validate_submission(&good_submission()).unwrap();
        assert_eq!(valid.status, AttendanceStatus::In);
        assert_eq!(valid.verified_by, "mgr1");
        assert!(valid.event_id.is_none());
        assert!(valid.check_in_time.is_none());
    }

    #[test]
    fn accepts_alias_vocabulary() {
        let mut sub = good_submission();
        sub.status = Some("Absent".into());
        let valid = validate_submission(&sub).unwrap();
        assert_eq!(valid.status, AttendanceStatus::Out);
    }

    #[test]
    fn reports_every_missing_field_at_once() {
        let violations = validate_submission(&AttendanceSubmission::default()).unwrap_err();
        let fields: Vec<_> = violations
            .iter()
            .filter_map(|v| match v {
                RuleViolation::MissingField { field, .. } => Some(*field),
                _ => None,
            })
            .collect();
        assert_eq!(fields, vec!["userId", "attendanceDate", "status", "verifiedBy"]);
    }

    #[test]
    fn short_verifier_reports_min_length_rule() {
        let mut sub = good_submission();
        sub.verified_by = Some("ab".into());
        let violations = validate_submission(&sub).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0],
            RuleViolation::TooShort { field: "verifiedBy", min: VERIFIED_BY_MIN_LEN, .. }
        ));
    }

    #[test]
    fn unknown_status_reports_invalid_value() {
        let mut sub = good_submission();
        sub.status = Some("Late".into());
        let violations = validate_submission(&sub).unwrap_err();
        assert!(matches!(
            violations[0],
            RuleViolation::InvalidValue { field: "status", .. }
        ));
    }

    #[test]
    fn check_in_after_check_out_reports_temporal_rule_unmasked() {
        let mut sub = good_submission();
        sub.check_in_time = Utc.with_ymd_and_hms(2024, 1, 10, 17, 0, 0).single();
        sub.check_out_time = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).single();
        let violations = validate_submission(&sub).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(matches!(violations[0], RuleViolation::TemporalOrder { .. }));
    }

    #[test]
    fn single_timestamp_skips_temporal_rule() {
        let mut sub = good_submission();
        sub.check_in_time = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).single();
        assert!(validate_submission(&sub).is_ok());
    }

    #[test]
    fn equal_timestamps_are_allowed() {
        let mut sub = good_submission();
        let t = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).single();
        sub.check_in_time = t;
        sub.check_out_time = t;
        assert!(validate_submission(&sub).is_ok());
    }

    #[test]
    fn bad_uuid_and_short_verifier_are_both_reported() {
        let mut sub = good_submission();
        sub.user_id = Some("not-a-uuid".into());
        sub.verified_by = Some("ab".into());
        let violations = validate_submission(&sub).unwrap_err();
        assert_eq!(violations.len(), 2);
    }
}
