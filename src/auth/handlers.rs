use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{CurrentUserResponse, LoginRequest, RegisterRequest, RegisterResponse},
        extractors::{SessionUser, SESSION_COOKIE},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::{ApiError, FieldError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/currentUser", get(current_user))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_registration(payload: &RegisterRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !is_valid_email(&payload.email) {
        errors.push(FieldError::new("email", "Invalid Email"));
    }
    if payload.password.len() < 3 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 3 characters",
        ));
    }
    if payload.first_name.len() < 2 {
        errors.push(FieldError::new(
            "firstName",
            "First Name must be at least 2 characters",
        ));
    }
    if payload.last_name.len() < 2 {
        errors.push(FieldError::new(
            "lastName",
            "Last Name must be at least 2 characters",
        ));
    }
    errors
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    payload.email = payload.email.trim().to_string();

    let violations = validate_registration(&payload);
    if !violations.is_empty() {
        warn!(count = violations.len(), "registration validation failed");
        return Err(ApiError::Validation(violations));
    }

    // Existence check must resolve before anything is written; a failed
    // lookup halts the whole operation.
    if User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(ApiError::Storage)?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password).map_err(ApiError::Internal)?;

    let user = User::create_with_default_categories(
        &state.db,
        &payload.email,
        &hash,
        &payload.first_name,
        &payload.last_name,
    )
    .await
    .map_err(ApiError::Storage)?;

    info!(user_id = %user.id, "user registered");
    Ok(Json(RegisterResponse { user_id: user.id }))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, &'static str), ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::MissingFields);
    }

    // Unknown email, lookup failure and wrong password all produce the
    // same response; nothing here may reveal whether the email exists.
    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("login with unknown email");
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => {
            warn!(error = %e, "login lookup failed");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash).map_err(ApiError::Internal)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let sid = state
        .sessions
        .create(user.id, state.config.session.ttl())
        .await
        .map_err(ApiError::Internal)?;

    let cookie = Cookie::build((SESSION_COOKIE, sid.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    info!(user_id = %user.id, "user logged in");
    Ok((jar.add(cookie), "Authed"))
}

#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, &'static str), ApiError> {
    if let Some(sid) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
    {
        state.sessions.delete(sid).await.map_err(ApiError::Session)?;
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    Ok((jar.remove(removal), "Deleted"))
}

#[instrument(skip_all)]
pub async fn current_user(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::Unauthenticated)?;

    Ok(Json(CurrentUserResponse {
        email: user.email,
        user_id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> RegisterRequest {
        RegisterRequest {
            email: "a@x.com".into(),
            password: "abc".into(),
            first_name: "Jo".into(),
            last_name: "Do".into(),
        }
    }

    #[test]
    fn accepts_minimal_valid_registration() {
        assert!(validate_registration(&valid_payload()).is_empty());
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["", "nope", "a@b", "a b@c.com", "@x.com"] {
            assert!(!is_valid_email(email), "{email:?} should be invalid");
        }
        assert!(is_valid_email("jo.do@example.co.uk"));
    }

    #[test]
    fn collects_every_violation_at_once() {
        let payload = RegisterRequest {
            email: "bad".into(),
            password: "ab".into(),
            first_name: "J".into(),
            last_name: "D".into(),
        };
        let errors = validate_registration(&payload);
        assert_eq!(errors.len(), 4);
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["email", "password", "firstName", "lastName"]);
    }

    #[test]
    fn password_of_three_chars_is_enough() {
        let mut payload = valid_payload();
        payload.password = "abc".into();
        assert!(validate_registration(&payload).is_empty());
        payload.password = "ab".into();
        assert_eq!(validate_registration(&payload).len(), 1);
    }
}
