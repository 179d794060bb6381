//! Session token codec
//!
//! Signs and verifies the compact tokens handed to the mobile client. A token
//! binds a [`User`] to the upstream access token it was minted with, so the
//! backend stays stateless; revocation is only possible through the TTL.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::error::AuthError;
use super::models::{SessionClaims, User};

pub struct TokenCodec {
    secret: String,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Mint a signed session token embedding the identity and the upstream
    /// access token, valid for `ttl`.
    pub fn issue(
        &self,
        user: &User,
        upstream_access_token: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            user: user.clone(),
            access_token: upstream_access_token.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims. Any
    /// failure mode (bad signature, malformed payload, expired) collapses to
    /// `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::from_account_claims("acct-1", "jdoe123@example.edu", Some("Jane Doe"))
    }

    #[test]
    fn round_trip_preserves_identity_and_access_token() {
        let codec = TokenCodec::new("test-secret");
        let user = test_user();

        let token = codec
            .issue(&user, "upstream-access-token", Duration::hours(1))
            .unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.user, user);
        assert_eq!(claims.access_token, "upstream-access-token");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = TokenCodec::new("test-secret");
        let token = codec
            .issue(&test_user(), "upstream", Duration::seconds(-30))
            .unwrap();

        assert!(matches!(
            codec.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = TokenCodec::new("test-secret");
        let token = codec
            .issue(&test_user(), "upstream", Duration::hours(1))
            .unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        // Flip a character in the payload segment.
        let payload = &parts[1];
        let flipped = if payload.starts_with('A') { "B" } else { "A" };
        parts[1] = format!("{}{}", flipped, &payload[1..]);
        let tampered = parts.join(".");

        assert!(matches!(
            codec.verify(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let codec = TokenCodec::new("test-secret");
        let other = TokenCodec::new("other-secret");
        let token = codec
            .issue(&test_user(), "upstream", Duration::hours(1))
            .unwrap();

        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let codec = TokenCodec::new("test-secret");
        assert!(matches!(
            codec.verify("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
