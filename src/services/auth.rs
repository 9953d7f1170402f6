// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login and token authentication.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{password, AuthError, CurrentUser, TokenIssuer};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{LoginRequest, RegisterRequest};
use crate::storage::{Store, StoredUser, UserRepository};

use super::require;

#[derive(Clone)]
pub struct AuthService {
    store: Store,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(store: Store, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, tokens }
    }

    /// Create an account.
    ///
    /// The taken-checks here only produce a friendlier error early; the
    /// unique index written with the user row is what actually enforces it.
    pub fn register(&self, request: RegisterRequest) -> ServiceResult<StoredUser> {
        require(&request.username, "username is required")?;
        require(&request.password, "password is required")?;
        require(&request.confirm_password, "password is required")?;
        require(&request.email, "email is required")?;
        if request.password != request.confirm_password {
            return Err(ServiceError::validation("passwords do not match"));
        }

        let users = UserRepository::new(&self.store);
        if users.username_taken(&request.username)? {
            return Err(ServiceError::UsernameTaken);
        }
        if users.email_taken(&request.email)? {
            return Err(ServiceError::EmailTaken);
        }

        let password_hash = password::hash_password(&request.password)
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;

        let user = users.create(StoredUser::new(
            request.username,
            request.email.trim().to_string(),
            password_hash,
        ))?;
        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown user, inactive user and wrong password are indistinguishable
    /// to the caller.
    pub fn login(&self, request: LoginRequest) -> ServiceResult<(String, StoredUser)> {
        require(&request.username, "username is required")?;
        require(&request.password, "password is required")?;

        let users = UserRepository::new(&self.store);
        let user = match users.find_by_username(&request.username)? {
            Some(user) => user,
            None => {
                // Burn one verification so unknown usernames take as long
                if let Err(e) = password::verify_password(&request.password, &password::DUMMY_HASH) {
                    warn!(error = %e, "Dummy hash verification failed unexpectedly");
                }
                warn!(username = %request.username, "Login attempt for unknown user");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let matches = password::verify_password(&request.password, &user.password_hash)
            .map_err(|e| ServiceError::Internal(format!("stored hash unreadable: {e}")))?;
        if !matches || !user.is_active {
            warn!(user_id = user.id, "Login attempt rejected");
            return Err(ServiceError::InvalidCredentials);
        }

        let user = users.record_login(user.id)?;
        let caller = CurrentUser {
            id: user.id,
            username: user.username.clone(),
        };
        let (token, _) = self
            .tokens
            .issue_for(&caller)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        info!(user_id = user.id, "User logged in");
        Ok((token, user))
    }

    /// Verify a bearer token and resolve it to an active user.
    ///
    /// One storage read, no writes.
    pub fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let claims = self.tokens.verify(token)?;
        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        let user = UserRepository::new(&self.store)
            .get(user_id)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        match user {
            Some(user) if user.is_active => Ok(CurrentUser {
                id: user.id,
                username: user.username,
            }),
            _ => Err(AuthError::UserNotFound),
        }
    }

    /// The caller's own account.
    pub fn profile(&self, caller: &CurrentUser) -> ServiceResult<StoredUser> {
        UserRepository::new(&self.store)
            .get(caller.id)?
            .ok_or(ServiceError::NotFound(crate::storage::EntityKind::User))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::tests::temp_store;
    use tempfile::TempDir;

    fn service() -> (AuthService, TempDir) {
        let (store, dir) = temp_store();
        let tokens = Arc::new(TokenIssuer::new(b"test-secret", 3600));
        (AuthService::new(store, tokens), dir)
    }

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
            confirm_password: "hunter22".to_string(),
        }
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn register_validates_fields_in_order() {
        let (auth, _dir) = service();

        let err = auth.register(RegisterRequest::default()).unwrap_err();
        assert_eq!(err.to_string(), "username is required");

        let mut req = register_request("alice", "");
        let err = auth.register(req.clone()).unwrap_err();
        assert_eq!(err.to_string(), "email is required");

        req.email = "a@example.com".to_string();
        req.confirm_password = "different".to_string();
        let err = auth.register(req).unwrap_err();
        assert_eq!(err.to_string(), "passwords do not match");
    }

    #[test]
    fn register_rejects_taken_username_and_email() {
        let (auth, _dir) = service();
        let user = auth.register(register_request("alice", "a@example.com")).unwrap();
        assert_eq!(user.id, 1);
        assert_ne!(user.password_hash, "hunter22");

        assert!(matches!(
            auth.register(register_request("alice", "other@example.com")),
            Err(ServiceError::UsernameTaken)
        ));
        assert!(matches!(
            auth.register(register_request("bob", "A@example.com")),
            Err(ServiceError::EmailTaken)
        ));
    }

    #[test]
    fn login_issues_token_that_authenticates() {
        let (auth, _dir) = service();
        let user = auth.register(register_request("alice", "a@example.com")).unwrap();

        let (token, logged_in) = auth.login(login_request("alice", "hunter22")).unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(logged_in.last_login.is_some());

        let caller = auth.authenticate(&token).unwrap();
        assert_eq!(caller.id, user.id);
        assert_eq!(caller.username, "alice");
    }

    #[test]
    fn login_failures_are_uniform() {
        let (auth, _dir) = service();
        auth.register(register_request("alice", "a@example.com")).unwrap();

        assert!(matches!(
            auth.login(login_request("alice", "wrong")),
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login(login_request("nobody", "hunter22")),
            Err(ServiceError::InvalidCredentials)
        ));
        let err = auth.login(login_request("alice", "")).unwrap_err();
        assert_eq!(err.to_string(), "password is required");
    }

    #[test]
    fn authenticate_rejects_garbage_and_unknown_subjects() {
        let (auth, _dir) = service();
        assert!(matches!(auth.authenticate("nope"), Err(AuthError::InvalidToken)));

        let orphan = auth
            .tokens
            .issue(77, "ghost", chrono::Utc::now().timestamp() + 60)
            .unwrap();
        assert!(matches!(auth.authenticate(&orphan), Err(AuthError::UserNotFound)));
    }

    #[test]
    fn inactive_user_cannot_log_in_or_authenticate() {
        let (auth, _dir) = service();
        let user = auth.register(register_request("alice", "a@example.com")).unwrap();
        let (token, _) = auth.login(login_request("alice", "hunter22")).unwrap();

        auth.store
            .update(user.id, |u: &mut StoredUser| u.is_active = false)
            .unwrap();

        assert!(matches!(auth.authenticate(&token), Err(AuthError::UserNotFound)));
        assert!(matches!(
            auth.login(login_request("alice", "hunter22")),
            Err(ServiceError::InvalidCredentials)
        ));
    }
}
