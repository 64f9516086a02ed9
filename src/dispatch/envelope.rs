use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Originating transport of a request. The tag is stable so a handler
/// could branch on it without importing transport types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Http,
    /// Direct invocation without a transport, used by tests and tooling.
    Direct,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Http => "http",
            Source::Direct => "direct",
        }
    }
}

/// Transport-neutral request representation: who/what is asking, with
/// what payload. Created fresh per request and discarded after dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub source: Source,
    pub payload: Payload,
}

impl Envelope {
    pub fn new(source: Source, payload: Payload) -> Self {
        Self { source, payload }
    }
}

/// Operation-specific payloads. One variant per operation kind, each
/// carrying exactly the fields that operation needs; identifiers stay raw
/// strings here because adapters reshape, they never validate.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Bearer credential for the Auth Gate. `None` when the header was
    /// absent or carried no token segment.
    AccessToken { token: Option<String> },
    /// Single user by id, or all users when no id is populated.
    UserQuery { id: Option<String> },
    UserUpdate { id: String, data: Value },
    /// Single user by id, or all users when no id is populated.
    UserDelete { id: Option<String> },
    AttendanceSubmit { data: Value },
    AttendanceUpdate { id: String, data: Value },
}

impl Payload {
    /// Operation kind label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::AccessToken { .. } => "access_token",
            Payload::UserQuery { .. } => "user_query",
            Payload::UserUpdate { .. } => "user_update",
            Payload::UserDelete { .. } => "user_delete",
            Payload::AttendanceSubmit { .. } => "attendance_submit",
            Payload::AttendanceUpdate { .. } => "attendance_update",
        }
    }
}
