use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::dispatch::{Envelope, Payload};
use crate::error::ApiError;

use super::{AuthUser, TokenVerifier, VerifyError};

/// Hard gate in front of every handler: one verification attempt per
/// request, no retry, no refresh. The verifier call is bounded by a
/// timeout so a stalled credential check cannot stall the pipeline.
pub struct AuthGate {
    verifier: Arc<dyn TokenVerifier>,
    timeout: Duration,
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>, timeout: Duration) -> Self {
        Self { verifier, timeout }
    }

    /// Verify the bearer credential carried by an auth envelope. On
    /// success the verified identity is returned for the request context;
    /// on any failure the pipeline short-circuits.
    pub async fn verify(&self, envelope: &Envelope) -> Result<AuthUser, ApiError> {
        let token = match &envelope.payload {
            Payload::AccessToken { token } => token.as_deref(),
            other => {
                tracing::warn!(kind = other.kind(), "non-credential payload reached the gate");
                None
            }
        };

        let Some(token) = token else {
            tracing::debug!(source = envelope.source.as_str(), "request without access token");
            return Err(ApiError::unauthorized("Missing access token"));
        };

        match timeout(self.timeout, self.verifier.verify(token)).await {
            Ok(Ok(claims)) => {
                tracing::debug!(user_id = %claims.sub, "token verified");
                Ok(AuthUser::from(claims))
            }
            Ok(Err(VerifyError::Unavailable(msg))) => {
                tracing::error!("credential verifier unavailable: {}", msg);
                Err(ApiError::service_unavailable("Credential verification unavailable"))
            }
            Ok(Err(err)) => {
                tracing::debug!(source = envelope.source.as_str(), "token rejected: {}", err);
                Err(ApiError::unauthorized(err.to_string()))
            }
            Err(_) => {
                tracing::error!("credential verification timed out after {:?}", self.timeout);
                Err(ApiError::service_unavailable("Credential verification timed out"))
            }
        }
    }
}
