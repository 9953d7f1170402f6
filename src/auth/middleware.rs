// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for protected routes.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/agents", get(list_agents))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```
//!
//! A request either leaves the gate with a [`CurrentUser`] in its extensions
//! or is answered here with a 401 and never reaches the handler.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::{AuthError, CurrentUser};
use crate::state::AppState;

/// Authentication middleware function.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(e) => {
            debug!(path = %request.uri().path(), reason = e.error_code(), "Rejected request");
            return e.into_response();
        }
    };

    match state.auth.authenticate(&token) {
        Ok(user) => {
            // Add authenticated user to request extensions
            request.extensions_mut().insert::<CurrentUser>(user);
            next.run(request).await
        }
        Err(e) => {
            debug!(path = %request.uri().path(), reason = e.error_code(), "Rejected request");
            e.into_response()
        }
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    match header.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(AuthError::InvalidToken),
    }
}
