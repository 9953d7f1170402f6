// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for all entity operations.
//!
//! Ownership is never stored on a child row. It is re-derived from storage on
//! every call by walking the chain up to the root user:
//!
//! ```text
//! User ─< Agent ─< Client ─< Message / Transaction
//!               └────────────< (agent_id on the entry)
//! ```
//!
//! The addressed row must be live. Parent rows on the way up are read
//! including soft-deleted ones, so a child keeps its owner after its parent
//! is deleted.

use tracing::warn;

use crate::auth::CurrentUser;
use crate::error::{ServiceError, ServiceResult};

use super::repository::{StoredAgent, StoredClient};
use super::{EntityKind, Record, Store};

/// Entries that hang off a client and repeat its agent id.
pub trait ClientScoped: Record {
    fn agent_id(&self) -> u64;
    fn client_id(&self) -> u64;
}

/// Reject the zero id before touching storage.
pub fn ensure_id(id: u64, kind: EntityKind) -> ServiceResult<u64> {
    if id == 0 {
        Err(ServiceError::InvalidId(kind))
    } else {
        Ok(id)
    }
}

/// Resolves and checks ownership chains against the caller.
pub struct OwnershipResolver<'a> {
    store: &'a Store,
}

impl<'a> OwnershipResolver<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Owner of a live agent.
    pub fn resolve_agent_owner(&self, agent_id: u64) -> ServiceResult<u64> {
        Ok(self.load::<StoredAgent>(agent_id)?.user_id)
    }

    /// `(agent_id, user_id)` of a live client.
    pub fn resolve_client_owner(&self, client_id: u64) -> ServiceResult<(u64, u64)> {
        let client = self.load::<StoredClient>(client_id)?;
        let user_id = self.chain_owner(client.agent_id)?;
        Ok((client.agent_id, user_id))
    }

    /// `(agent_id, client_id, user_id)` of a live message or transaction.
    pub fn resolve_entry_owner<T: ClientScoped>(&self, id: u64) -> ServiceResult<(u64, u64, u64)> {
        let entry = self.load::<T>(id)?;
        let user_id = self.chain_owner(entry.agent_id())?;
        Ok((entry.agent_id(), entry.client_id(), user_id))
    }

    // =========================================================================
    // Authorization
    // =========================================================================

    /// Load a live agent the caller owns.
    pub fn authorize_agent(&self, caller: &CurrentUser, agent_id: u64) -> ServiceResult<StoredAgent> {
        let agent = self.load::<StoredAgent>(agent_id)?;
        Self::check_owner(caller, EntityKind::Agent, agent_id, agent.user_id)?;
        Ok(agent)
    }

    /// Load a live client whose agent the caller owns.
    pub fn authorize_client(
        &self,
        caller: &CurrentUser,
        client_id: u64,
    ) -> ServiceResult<StoredClient> {
        let client = self.load::<StoredClient>(client_id)?;
        let owner = self.chain_owner(client.agent_id)?;
        Self::check_owner(caller, EntityKind::Client, client_id, owner)?;
        Ok(client)
    }

    /// Load a live message or transaction the caller owns and check that its
    /// client belongs to its agent.
    pub fn authorize_entry<T: ClientScoped>(&self, caller: &CurrentUser, id: u64) -> ServiceResult<T> {
        let entry = self.load::<T>(id)?;
        let owner = self.chain_owner(entry.agent_id())?;
        Self::check_owner(caller, T::KIND, id, owner)?;

        let client = self.store.find_any::<StoredClient>(entry.client_id())?;
        match client {
            Some(client) if client.agent_id == entry.agent_id() => Ok(entry),
            _ => {
                warn!(kind = %T::KIND, id, "Entry references a client of another agent");
                Err(ServiceError::RelationshipInconsistent)
            }
        }
    }

    /// Check that the caller may attach a new entry to `(agent_id, client_id)`.
    pub fn authorize_new_entry(
        &self,
        caller: &CurrentUser,
        agent_id: u64,
        client_id: u64,
    ) -> ServiceResult<(StoredAgent, StoredClient)> {
        ensure_id(agent_id, EntityKind::Agent)?;
        ensure_id(client_id, EntityKind::Client)?;

        let agent = self.authorize_agent(caller, agent_id)?;
        let client = self.load::<StoredClient>(client_id)?;
        Self::check_relationship(&agent, &client)?;
        Ok((agent, client))
    }

    /// Check a listing scope of agent, client, or both.
    ///
    /// With both, the client must belong to the agent.
    pub fn authorize_scope(
        &self,
        caller: &CurrentUser,
        agent_id: Option<u64>,
        client_id: Option<u64>,
    ) -> ServiceResult<()> {
        match (agent_id, client_id) {
            (None, None) => Err(ServiceError::validation(
                "agent ID or client ID is required",
            )),
            (Some(agent_id), None) => {
                ensure_id(agent_id, EntityKind::Agent)?;
                self.authorize_agent(caller, agent_id).map(|_| ())
            }
            (None, Some(client_id)) => {
                ensure_id(client_id, EntityKind::Client)?;
                self.authorize_client(caller, client_id).map(|_| ())
            }
            (Some(agent_id), Some(client_id)) => {
                self.authorize_new_entry(caller, agent_id, client_id).map(|_| ())
            }
        }
    }

    /// Error for a create whose explicit id is taken (live or soft-deleted).
    ///
    /// The caller learns the id exists only when the occupant is theirs;
    /// anyone else gets the same answer as for a foreign row.
    pub fn occupied_id_error<T, F>(
        &self,
        caller: &CurrentUser,
        id: u64,
        agent_of: F,
    ) -> ServiceError
    where
        T: Record,
        F: FnOnce(&T) -> u64,
    {
        let occupant = match self.store.find_any::<T>(id) {
            Ok(Some(occupant)) => occupant,
            Ok(None) => return ServiceError::AlreadyExists(T::KIND),
            Err(e) => return e.into(),
        };
        match self.chain_owner(agent_of(&occupant)) {
            Ok(owner) if owner == caller.id => ServiceError::AlreadyExists(T::KIND),
            Ok(_) => {
                warn!(user_id = caller.id, kind = %T::KIND, id, "Create over a foreign id");
                ServiceError::Unauthorized
            }
            Err(e) => e,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn load<T: Record>(&self, id: u64) -> ServiceResult<T> {
        ensure_id(id, T::KIND)?;
        self.store
            .find::<T>(id)?
            .ok_or(ServiceError::NotFound(T::KIND))
    }

    /// Owner of an agent reached by walking up from a child row.
    ///
    /// A parent that was never written breaks the chain; nobody owns it.
    fn chain_owner(&self, agent_id: u64) -> ServiceResult<u64> {
        match self.store.find_any::<StoredAgent>(agent_id)? {
            Some(agent) => Ok(agent.user_id),
            None => {
                warn!(agent_id, "Ownership chain has no agent row");
                Err(ServiceError::Unauthorized)
            }
        }
    }

    fn check_owner(caller: &CurrentUser, kind: EntityKind, id: u64, owner: u64) -> ServiceResult<()> {
        if owner == caller.id {
            Ok(())
        } else {
            warn!(user_id = caller.id, %kind, id, "Ownership check failed");
            Err(ServiceError::Unauthorized)
        }
    }

    fn check_relationship(agent: &StoredAgent, client: &StoredClient) -> ServiceResult<()> {
        if client.agent_id == agent.id {
            Ok(())
        } else {
            warn!(agent_id = agent.id, client_id = client.id, "Client belongs to another agent");
            Err(ServiceError::RelationshipInconsistent)
        }
    }
}
