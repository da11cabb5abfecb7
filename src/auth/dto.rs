use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration.
///
/// Missing fields deserialize as empty strings so validation can report
/// every violation in one pass instead of failing at the JSON layer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response returned after a successful registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: Uuid,
}

/// Public view of the authenticated user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub email: String,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_response_uses_camel_case() {
        let response = RegisterResponse {
            user_id: Uuid::new_v4(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"userId\""));
    }

    #[test]
    fn current_user_response_exposes_exactly_four_fields() {
        let response = CurrentUserResponse {
            email: "a@x.com".into(),
            user_id: Uuid::new_v4(),
            first_name: "Jo".into(),
            last_name: "Do".into(),
        };
        let value = serde_json::to_value(&response).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(obj.contains_key("email"));
        assert!(obj.contains_key("userId"));
        assert!(obj.contains_key("firstName"));
        assert!(obj.contains_key("lastName"));
    }

    #[test]
    fn register_request_tolerates_missing_fields() {
        let req: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
    }
}
