use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    app_state::{AccessPolicy, AppState},
    routes::ApiError,
};

/// An actor allowed to mutate the library.
///
/// Extracting it is the authorization gate: handlers that take an `Actor`
/// only run once the request has been admitted. Returns 401 Unauthorized
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// Admitted because auth is disabled.
    Anonymous,
    /// Presented the configured bearer token.
    TokenHolder,
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let expected = match &state.access {
            AccessPolicy::Open => return Ok(Actor::Anonymous),
            AccessPolicy::Deny => {
                return Err(ApiError::unauthorized("Mutations are disabled"));
            }
            AccessPolicy::BearerToken(token) => token,
        };

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        if presented != expected.as_str() {
            tracing::warn!("Rejected request with invalid bearer token");
            return Err(ApiError::unauthorized("Not authenticated"));
        }

        Ok(Actor::TokenHolder)
    }
}
