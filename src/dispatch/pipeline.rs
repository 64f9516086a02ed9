// Fixed two-stage request pipeline: authenticate, then handle. Routes
// compose one pipeline each; nothing else may invoke a handler, so every
// handler invocation has passed the gate.
use async_trait::async_trait;
use serde_json::Value;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::Envelope;

/// Pure reshaping function from a raw transport request to an envelope.
/// Adapters never validate and never touch collaborators.
pub type Adapter<R> = fn(&R) -> Envelope;

/// Request-scoped context carrying the identity the gate verified.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub identity: AuthUser,
}

/// Business operation with a uniform contract. Handlers see only the
/// envelope, the request context, and the abstract collaborators in
/// `AppState`; the same handler accepts an envelope built by any adapter.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Stable operation name for logs.
    fn name(&self) -> &'static str;

    async fn handle(
        &self,
        state: &AppState,
        envelope: Envelope,
        ctx: &RequestContext,
    ) -> Result<Value, ApiError>;
}

/// Per-route composition of an auth adapter, an operation adapter, and a
/// handler. Generic over the raw request type; knows nothing of payload
/// shapes beyond the envelope's two fields.
pub struct Pipeline<R> {
    auth_adapter: Adapter<R>,
    op_adapter: Adapter<R>,
    handler: Box<dyn Handler>,
}

impl<R: Sync> Pipeline<R> {
    pub fn new(auth_adapter: Adapter<R>, op_adapter: Adapter<R>, handler: Box<dyn Handler>) -> Self {
        Self {
            auth_adapter,
            op_adapter,
            handler,
        }
    }

    /// Run the two stages in order. Stage ordering is fixed: the handler
    /// never executes unless the gate accepted the credential, and every
    /// error propagates to the caller untouched.
    pub async fn dispatch(&self, state: &AppState, raw: &R) -> Result<Value, ApiError> {
        let auth_envelope = (self.auth_adapter)(raw);
        let identity = state.gate.verify(&auth_envelope).await?;

        let envelope = (self.op_adapter)(raw);
        tracing::debug!(
            handler = self.handler.name(),
            source = envelope.source.as_str(),
            payload = envelope.payload.kind(),
            user_id = %identity.user_id,
            "dispatching request"
        );

        let ctx = RequestContext { identity };
        self.handler.handle(state, envelope, &ctx).await
    }
}
