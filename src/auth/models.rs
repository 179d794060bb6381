//! Authentication data models

use serde::{Deserialize, Serialize};

/// Canonical user identity, derived once from the provider account claims at
/// login and immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub university_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl User {
    /// The university id is the email local-part; the display name falls back
    /// to the principal name when the provider sends none.
    pub fn from_account_claims(
        account_id: &str,
        principal_name: &str,
        display_name: Option<&str>,
    ) -> Self {
        let university_id = principal_name
            .split('@')
            .next()
            .unwrap_or(principal_name)
            .to_string();
        let name = display_name
            .filter(|n| !n.is_empty())
            .unwrap_or(principal_name)
            .to_string();
        Self {
            id: account_id.to_string(),
            email: principal_name.to_string(),
            name,
            university_id,
            profile_picture: None,
        }
    }
}

/// Session token claims. The upstream Graph access token travels inside the
/// signed token so the backend holds no session state between requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user: User,
    pub access_token: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub code: Option<String>,
    #[allow(dead_code)]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn university_id_is_email_local_part() {
        let user = User::from_account_claims("acct-1", "jdoe123@example.edu", Some("Jane Doe"));
        assert_eq!(user.university_id, "jdoe123");
        assert_eq!(user.email, "jdoe123@example.edu");
        assert_eq!(user.name, "Jane Doe");
    }

    #[test]
    fn name_falls_back_to_principal_name() {
        let user = User::from_account_claims("acct-1", "jdoe123@example.edu", None);
        assert_eq!(user.name, "jdoe123@example.edu");

        let user = User::from_account_claims("acct-1", "jdoe123@example.edu", Some(""));
        assert_eq!(user.name, "jdoe123@example.edu");
    }

    #[test]
    fn user_serializes_camel_case() {
        let user = User::from_account_claims("acct-1", "jdoe123@example.edu", Some("Jane"));
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["universityId"], "jdoe123");
        assert!(value.get("profilePicture").is_none());
    }
}
