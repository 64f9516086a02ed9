pub mod attendance;

pub use attendance::{validate_submission, RuleViolation};
