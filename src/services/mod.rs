// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Entity Services
//!
//! One service per entity. Every method that touches an owned entity takes
//! the caller as `&CurrentUser` and checks ownership through
//! [`OwnershipResolver`](crate::storage::OwnershipResolver) before reading
//! or writing.
//!
//! Services are cheap to clone; they hold a [`Store`](crate::storage::Store)
//! handle and nothing else that changes.

pub mod agents;
pub mod auth;
pub mod clients;
pub mod messages;
pub mod transactions;

pub use agents::AgentService;
pub use auth::AuthService;
pub use clients::ClientService;
pub use messages::MessageService;
pub use transactions::TransactionService;

use crate::auth::CurrentUser;
use crate::error::{ServiceError, ServiceResult};
use crate::storage::{EntityKind, OwnershipResolver, Record, StorageError, StorageResult, Store};

/// Largest id a client may choose on create (2^53 - 1, exact in JSON
/// numbers). Leaves the rest of the `u64` range to server-assigned ids.
pub const MAX_EXPLICIT_ID: u64 = (1 << 53) - 1;

/// Reject blank strings with `message`.
pub(crate) fn require(value: &str, message: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ServiceError::validation(message))
    } else {
        Ok(())
    }
}

/// Like [`require`], for a field that may be absent from a partial update.
pub(crate) fn require_if_present(value: Option<&str>, message: &str) -> ServiceResult<()> {
    match value {
        Some(value) => require(value, message),
        None => Ok(()),
    }
}

/// A parent reference that must be supplied. `0` counts as missing.
pub(crate) fn require_parent(id: u64, kind: EntityKind) -> ServiceResult<u64> {
    if id == 0 {
        Err(ServiceError::validation(format!("{kind} ID is required")))
    } else {
        Ok(id)
    }
}

/// Client-supplied id on create: absent means "assign one"; zero and ids
/// above [`MAX_EXPLICIT_ID`] are invalid.
pub(crate) fn explicit_id(id: Option<u64>, kind: EntityKind) -> ServiceResult<u64> {
    match id {
        None => Ok(0),
        Some(id) if id == 0 || id > MAX_EXPLICIT_ID => Err(ServiceError::InvalidId(kind)),
        Some(id) => Ok(id),
    }
}

/// Translate the outcome of a create. An occupied explicit id is reported as
/// `AlreadyExists` only to the occupant's owner; `agent_of` names the agent
/// whose owner that is.
pub(crate) fn created<T, F>(
    store: &Store,
    caller: &CurrentUser,
    result: StorageResult<T>,
    agent_of: F,
) -> ServiceResult<T>
where
    T: Record,
    F: FnOnce(&T) -> u64,
{
    result.map_err(|err| match err {
        StorageError::AlreadyExists { id, .. } => {
            OwnershipResolver::new(store).occupied_id_error::<T, F>(caller, id, agent_of)
        }
        other => other.into(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_blank() {
        assert!(require("x", "x is required").is_ok());
        let err = require("   ", "agent name is required").unwrap_err();
        assert_eq!(err.to_string(), "agent name is required");
    }

    #[test]
    fn require_parent_names_the_entity() {
        let err = require_parent(0, EntityKind::Client).unwrap_err();
        assert_eq!(err.to_string(), "client ID is required");
        assert_eq!(require_parent(3, EntityKind::Client).unwrap(), 3);
    }

    #[test]
    fn explicit_id_rules() {
        assert_eq!(explicit_id(None, EntityKind::Agent).unwrap(), 0);
        assert_eq!(explicit_id(Some(9), EntityKind::Agent).unwrap(), 9);
        assert!(matches!(
            explicit_id(Some(0), EntityKind::Agent),
            Err(ServiceError::InvalidId(EntityKind::Agent))
        ));
        assert_eq!(
            explicit_id(Some(MAX_EXPLICIT_ID), EntityKind::Agent).unwrap(),
            MAX_EXPLICIT_ID
        );
        assert!(matches!(
            explicit_id(Some(MAX_EXPLICIT_ID + 1), EntityKind::Client),
            Err(ServiceError::InvalidId(EntityKind::Client))
        ));
        assert!(matches!(
            explicit_id(Some(u64::MAX), EntityKind::Message),
            Err(ServiceError::InvalidId(EntityKind::Message))
        ));
    }
}
