// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};

/// Claims carried by tokens this server issues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the user id as a decimal string
    pub sub: String,

    pub username: String,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiration (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Parse `sub` back into a user id. Zero is not a valid id.
    pub fn user_id(&self) -> Option<u64> {
        self.sub.parse::<u64>().ok().filter(|id| *id != 0)
    }
}

/// The caller of a protected request, attached by the authentication gate.
///
/// Handlers receive it through the `Auth` extractor and pass it down
/// explicitly; it is never read from request bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: u64,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: "alice".to_string(),
            iat: 0,
            exp: 10,
        }
    }

    #[test]
    fn user_id_parses_decimal_subject() {
        assert_eq!(claims("42").user_id(), Some(42));
    }

    #[test]
    fn user_id_rejects_zero_and_garbage() {
        assert_eq!(claims("0").user_id(), None);
        assert_eq!(claims("user_42").user_id(), None);
        assert_eq!(claims("").user_id(), None);
    }
}
