use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// Resolves the session cookie to the authenticated user's id.
pub struct SessionUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthenticated)?;

        let sid = jar
            .get(SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok())
            .ok_or(ApiError::Unauthenticated)?;

        let user_id = state
            .sessions
            .resolve(sid)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::Unauthenticated)?;

        Ok(SessionUser(user_id))
    }
}
