// User operations. Transport-ignorant: inputs arrive as envelope
// payloads, the verified identity sits in the request context, and
// storage is reached only through the UserStore seam.
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dispatch::{Envelope, Handler, Payload, RequestContext};
use crate::error::ApiError;
use crate::models::UserUpdate;
use crate::state::AppState;
use crate::store::UserStore;
use crate::validation::RuleViolation;

fn user_not_found(raw_id: &str) -> ApiError {
    ApiError::not_found(format!("User '{}' not found", raw_id))
}

/// Parse a path identifier. A string that is not a UUID cannot reference
/// an existing user, so it resolves to not-found rather than bad-request.
fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| user_not_found(raw))
}

fn unexpected_payload(handler: &'static str, payload: &Payload) -> ApiError {
    tracing::error!(handler, payload = payload.kind(), "payload does not match handler");
    ApiError::internal("Request was routed with a mismatched payload")
}

/// Single user by id, or all users when the payload carries no id.
pub struct GetUsers;

#[async_trait]
impl Handler for GetUsers {
    fn name(&self) -> &'static str {
        "users.get"
    }

    async fn handle(
        &self,
        state: &AppState,
        envelope: Envelope,
        _ctx: &RequestContext,
    ) -> Result<Value, ApiError> {
        let id = match envelope.payload {
            Payload::UserQuery { id } => id,
            other => return Err(unexpected_payload(self.name(), &other)),
        };

        match id {
            None => {
                let users = state.users.list().await?;
                Ok(serde_json::to_value(users)?)
            }
            Some(raw) => {
                let id = parse_user_id(&raw)?;
                let user = state
                    .users
                    .get(id)
                    .await?
                    .ok_or_else(|| user_not_found(&raw))?;
                Ok(serde_json::to_value(user)?)
            }
        }
    }
}

pub struct UpdateUser;

#[async_trait]
impl Handler for UpdateUser {
    fn name(&self) -> &'static str {
        "users.update"
    }

    async fn handle(
        &self,
        state: &AppState,
        envelope: Envelope,
        _ctx: &RequestContext,
    ) -> Result<Value, ApiError> {
        let (raw_id, data) = match envelope.payload {
            Payload::UserUpdate { id, data } => (id, data),
            other => return Err(unexpected_payload(self.name(), &other)),
        };

        let id = parse_user_id(&raw_id)?;
        let changes: UserUpdate = serde_json::from_value(data)
            .map_err(|e| ApiError::bad_request(format!("Invalid update body: {}", e)))?;

        let mut violations = Vec::new();
        if matches!(changes.name.as_deref(), Some("")) {
            violations.push(RuleViolation::invalid("name", "name must not be empty"));
        }
        if matches!(changes.email.as_deref(), Some("")) {
            violations.push(RuleViolation::invalid("email", "email must not be empty"));
        }
        if !violations.is_empty() {
            return Err(ApiError::validation(violations));
        }

        // The refreshed timestamp travels with the attribute changes as
        // one logical write: no update persists without it.
        let updated = state
            .users
            .update(id, changes, Utc::now())
            .await?
            .ok_or_else(|| user_not_found(&raw_id))?;

        tracing::info!(user_id = %id, "user updated");
        Ok(serde_json::to_value(updated)?)
    }
}

/// Single user by id, or every user when the payload carries no id.
pub struct DeleteUsers;

#[async_trait]
impl Handler for DeleteUsers {
    fn name(&self) -> &'static str {
        "users.delete"
    }

    async fn handle(
        &self,
        state: &AppState,
        envelope: Envelope,
        ctx: &RequestContext,
    ) -> Result<Value, ApiError> {
        let id = match envelope.payload {
            Payload::UserDelete { id } => id,
            other => return Err(unexpected_payload(self.name(), &other)),
        };

        match id {
            None => {
                let deleted = state.users.delete_all().await?;
                tracing::info!(deleted, actor = %ctx.identity.user_id, "all users deleted");
                Ok(json!({ "deleted": deleted }))
            }
            Some(raw) => {
                let id = parse_user_id(&raw)?;
                if !state.users.delete(id).await? {
                    return Err(user_not_found(&raw));
                }
                tracing::info!(user_id = %id, actor = %ctx.identity.user_id, "user deleted");
                Ok(json!({ "deleted": 1, "id": id }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use crate::dispatch::Source;
    use crate::models::Role;
    use crate::state::AppState;
    use axum::http::StatusCode;
    use std::time::Duration;

    fn ctx() -> RequestContext {
        RequestContext {
            identity: AuthUser {
                user_id: Uuid::new_v4(),
                name: "admin".into(),
                role: Role::Admin,
            },
        }
    }

    fn envelope(payload: Payload) -> Envelope {
        Envelope::new(Source::Direct, payload)
    }

    async fn seeded_state() -> (AppState, Uuid) {
        let (state, users, _, _) = AppState::in_memory("secret", Duration::from_secs(1));
        let id = users.seed("Alice", Role::User, "alice@example.com").await;
        users.seed("Bob", Role::User, "bob@example.com").await;
        (state, id)
    }

    #[tokio::test]
    async fn lists_all_users_when_no_id_populated() {
        let (state, _) = seeded_state().await;
        let result = GetUsers
            .handle(&state, envelope(Payload::UserQuery { id: None }), &ctx())
            .await
            .unwrap();
        assert_eq!(result.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn gets_single_user_by_id() {
        let (state, id) = seeded_state().await;
        let result = GetUsers
            .handle(
                &state,
                envelope(Payload::UserQuery {
                    id: Some(id.to_string()),
                }),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result["name"], "Alice");
        assert!(result.get("password").is_none());
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let (state, _) = seeded_state().await;
        for raw in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
            let err = GetUsers
                .handle(&state, envelope(Payload::UserQuery { id: Some(raw) }), &ctx())
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_with_the_change() {
        let (state, id) = seeded_state().await;
        let before = state.users.get(id).await.unwrap().unwrap().updated_at;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let result = UpdateUser
            .handle(
                &state,
                envelope(Payload::UserUpdate {
                    id: id.to_string(),
                    data: json!({ "name": "Alicia" }),
                }),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result["name"], "Alicia");

        let after = state.users.get(id).await.unwrap().unwrap();
        assert_eq!(after.name, "Alicia");
        assert_eq!(after.email, "alice@example.com");
        assert!(after.updated_at > before);
    }

    #[tokio::test]
    async fn update_of_unknown_id_mutates_nothing() {
        let (state, _) = seeded_state().await;
        let before = state.users.list().await.unwrap();
        let err = UpdateUser
            .handle(
                &state,
                envelope(Payload::UserUpdate {
                    id: Uuid::new_v4().to_string(),
                    data: json!({ "name": "Mallory" }),
                }),
                &ctx(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let after = state.users.list().await.unwrap();
        assert_eq!(before.len(), after.len());
        assert!(after.iter().all(|u| u.name != "Mallory"));
    }

    #[tokio::test]
    async fn empty_name_is_a_validation_error() {
        let (state, id) = seeded_state().await;
        let err = UpdateUser
            .handle(
                &state,
                envelope(Payload::UserUpdate {
                    id: id.to_string(),
                    data: json!({ "name": "" }),
                }),
                &ctx(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn delete_all_reports_count() {
        let (state, _) = seeded_state().await;
        let result = DeleteUsers
            .handle(&state, envelope(Payload::UserDelete { id: None }), &ctx())
            .await
            .unwrap();
        assert_eq!(result["deleted"], 2);
        assert!(state.users.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_by_id_removes_only_that_user() {
        let (state, id) = seeded_state().await;
        let result = DeleteUsers
            .handle(
                &state,
                envelope(Payload::UserDelete {
                    id: Some(id.to_string()),
                }),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result["deleted"], 1);
        assert_eq!(state.users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let (state, _) = seeded_state().await;
        let err = DeleteUsers
            .handle(
                &state,
                envelope(Payload::UserDelete {
                    id: Some(Uuid::new_v4().to_string()),
                }),
                &ctx(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
