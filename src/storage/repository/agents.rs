// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Agent repository.
//!
//! Agents are the root of every ownership chain below the user: clients,
//! messages and transactions all resolve their owner through an agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::AGENTS;
use super::super::{EntityKind, Store, StorageResult};

/// Agent as persisted and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StoredAgent {
    pub id: u64,
    /// Owning user
    pub user_id: u64,
    pub name: String,
    pub characteristics: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

crate::impl_record!(StoredAgent, EntityKind::Agent, AGENTS);

impl StoredAgent {
    /// New agent; `id` of `0` lets the store assign one.
    pub fn new(id: u64, user_id: u64, name: String, characteristics: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            name,
            characteristics,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Repository for agent operations.
pub struct AgentRepository<'a> {
    store: &'a Store,
}

impl<'a> AgentRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Get a live agent by id.
    pub fn get(&self, agent_id: u64) -> StorageResult<Option<StoredAgent>> {
        self.store.find(agent_id)
    }

    pub fn create(&self, agent: StoredAgent) -> StorageResult<StoredAgent> {
        self.store.insert(agent)
    }

    pub fn update<F>(&self, agent_id: u64, change: F) -> StorageResult<StoredAgent>
    where
        F: FnOnce(&mut StoredAgent),
    {
        self.store.update(agent_id, change)
    }

    /// Soft-delete an agent. Its clients are left untouched.
    pub fn delete(&self, agent_id: u64) -> StorageResult<()> {
        self.store.soft_delete::<StoredAgent>(agent_id)
    }

    /// List live agents owned by a user.
    pub fn list_by_owner(&self, user_id: u64) -> StorageResult<Vec<StoredAgent>> {
        self.store
            .find_many(|agent: &StoredAgent| agent.user_id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::tests::temp_store;

    fn test_agent(user_id: u64, name: &str) -> StoredAgent {
        StoredAgent::new(0, user_id, name.to_string(), "patient".to_string())
    }

    #[test]
    fn list_by_owner_filters_correctly() {
        let (store, _dir) = temp_store();
        let repo = AgentRepository::new(&store);

        repo.create(test_agent(1, "a")).unwrap();
        repo.create(test_agent(1, "b")).unwrap();
        repo.create(test_agent(2, "c")).unwrap();

        let mine = repo.list_by_owner(1).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|a| a.user_id == 1));
        assert_eq!(repo.list_by_owner(2).unwrap().len(), 1);
    }

    #[test]
    fn deleted_agent_drops_out_of_listing() {
        let (store, _dir) = temp_store();
        let repo = AgentRepository::new(&store);

        let agent = repo.create(test_agent(1, "a")).unwrap();
        repo.delete(agent.id).unwrap();

        assert!(repo.get(agent.id).unwrap().is_none());
        assert!(repo.list_by_owner(1).unwrap().is_empty());
    }

    #[test]
    fn deleted_at_is_not_serialized_while_live() {
        let agent = test_agent(1, "a");
        let json = serde_json::to_value(&agent).unwrap();
        assert!(json.get("deleted_at").is_none());
        assert_eq!(json["user_id"], 1);
    }
}
