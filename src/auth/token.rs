// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token issuing and verification.
//!
//! One shared secret, no key rotation, no refresh, no revocation. A token is
//! valid while `now < exp`.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{AuthError, Claims, CurrentUser};

/// Issues and verifies bearer tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Create an issuer from the shared secret and token lifetime.
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a token for `user_id` expiring at `expires_at` (unix seconds).
    pub fn issue(&self, user_id: u64, username: &str, expires_at: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    /// Sign a token with the configured lifetime. Returns the token and its
    /// expiry.
    pub fn issue_for(&self, user: &CurrentUser) -> Result<(String, i64), AuthError> {
        let expires_at = Utc::now().timestamp() + self.ttl_secs;
        let token = self.issue(user.id, &user.username, expires_at)?;
        Ok((token, expires_at))
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as of `now` (unix seconds).
    ///
    /// Expiry is checked here rather than by `jsonwebtoken` so the boundary
    /// is exact: accepted for `now < exp`, rejected for `now >= exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?
            .claims;

        if now >= claims.exp {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret", 3600)
    }

    #[test]
    fn issued_token_verifies() {
        let issuer = issuer();
        let token = issuer.issue(7, "alice", Utc::now().timestamp() + 60).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.user_id(), Some(7));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let issuer = issuer();
        let exp = 2_000_000_000;
        let token = issuer.issue(1, "alice", exp).unwrap();

        assert!(issuer.verify_at(&token, exp - 1).is_ok());
        assert!(matches!(
            issuer.verify_at(&token, exp),
            Err(AuthError::InvalidToken)
        ));
        assert!(issuer.verify_at(&token, exp + 1).is_err());
    }

    #[test]
    fn issue_for_uses_configured_ttl() {
        let issuer = issuer();
        let user = CurrentUser {
            id: 3,
            username: "bob".to_string(),
        };
        let before = Utc::now().timestamp();
        let (token, exp) = issuer.issue_for(&user).unwrap();

        assert!(exp >= before + 3600);
        assert_eq!(issuer.verify(&token).unwrap().exp, exp);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issuer().issue(1, "alice", Utc::now().timestamp() + 60).unwrap();
        let other = TokenIssuer::new(b"other-secret", 3600);
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn malformed_and_tampered_tokens_are_rejected() {
        let issuer = issuer();
        assert!(issuer.verify("not-a-jwt").is_err());

        let token = issuer.issue(1, "alice", Utc::now().timestamp() + 60).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(
            format!(
                r#"{{"sub":"2","username":"mallory","iat":0,"exp":{}}}"#,
                Utc::now().timestamp() + 60
            )
            .as_bytes(),
        );
        parts[1] = &forged;
        assert!(matches!(
            issuer.verify(&parts.join(".")),
            Err(AuthError::InvalidToken)
        ));
    }
}
