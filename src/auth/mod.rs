// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Username/password accounts with self-issued bearer tokens.
//!
//! ## Auth Flow
//!
//! 1. Client registers, then logs in with username and password
//! 2. Server verifies the Argon2id hash and issues an HS256 JWT
//! 3. Client sends `Authorization: Bearer <token>` on every protected call
//! 4. The gate verifies signature and expiry, then loads the user:
//!    - `sub` → user id
//!    - user must exist, be active and not deleted
//!
//! ## Security
//!
//! - Tokens are stateless; logout does not revoke them
//! - Password hashes never leave the storage layer
//! - Every rejection is a 401 with an `error_code`

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{Claims, CurrentUser};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_auth;
pub use token::TokenIssuer;
