//! Caller identity.
//!
//! Every party-facing route sits behind [`resolve_caller`], which reads the
//! `profile_id` header, loads that profile, and stores it in the request
//! extensions. Handlers pick it up with the [`Caller`] extractor.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::ApiState;
use crate::db;
use crate::types::Profile;

pub const PROFILE_HEADER: &str = "profile_id";

/// The authenticated profile making the request.
#[derive(Debug, Clone)]
pub struct Caller(pub Profile);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Profile>()
            .cloned()
            .map(Caller)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Resolve the `profile_id` header to a stored profile, or answer 401.
pub async fn resolve_caller(
    State(state): State<Arc<ApiState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let profile_id = request
        .headers()
        .get(PROFILE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok());

    let Some(profile_id) = profile_id else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    match db::profile_by_id(&state.pool, profile_id).await {
        Ok(Some(profile)) => {
            request.extensions_mut().insert(profile);
            next.run(request).await
        }
        Ok(None) => {
            debug!(profile_id, "Unknown caller profile");
            StatusCode::UNAUTHORIZED.into_response()
        }
        Err(err) => err.into_response(),
    }
}
