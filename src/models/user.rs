use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Organization member. The credential hash is opaque to this layer and
/// never serialized back to clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "roles", rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Fields a PATCH may change. Absent fields are left untouched;
/// `updated_at` is refreshed by the handler, not by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub email: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            role: Role::Admin,
            email: "alice@example.com".into(),
            password: "argon2id$...".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let v = serde_json::to_value(&user).unwrap();
        assert!(v.get("password").is_none());
        assert_eq!(v["role"], "admin");
    }

    #[test]
    fn update_body_parses_partial_fields() {
        let update: UserUpdate = serde_json::from_value(serde_json::json!({
            "name": "Bob"
        }))
        .unwrap();
        assert_eq!(update.name.as_deref(), Some("Bob"));
        assert!(update.role.is_none());
        assert!(!update.is_empty());
    }
}
