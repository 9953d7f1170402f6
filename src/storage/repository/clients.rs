// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client repository. A client belongs to exactly one agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::CLIENTS;
use super::super::{EntityKind, Store, StorageResult};

/// Client as persisted and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StoredClient {
    pub id: u64,
    /// Parent agent
    pub agent_id: u64,
    pub name: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

crate::impl_record!(StoredClient, EntityKind::Client, CLIENTS);

impl StoredClient {
    pub fn new(id: u64, agent_id: u64, name: String, start_date: DateTime<Utc>, score: f64) -> Self {
        let now = Utc::now();
        Self {
            id,
            agent_id,
            name,
            start_date,
            score,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Repository for client operations.
pub struct ClientRepository<'a> {
    store: &'a Store,
}

impl<'a> ClientRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get(&self, client_id: u64) -> StorageResult<Option<StoredClient>> {
        self.store.find(client_id)
    }

    pub fn create(&self, client: StoredClient) -> StorageResult<StoredClient> {
        self.store.insert(client)
    }

    pub fn update<F>(&self, client_id: u64, change: F) -> StorageResult<StoredClient>
    where
        F: FnOnce(&mut StoredClient),
    {
        self.store.update(client_id, change)
    }

    pub fn delete(&self, client_id: u64) -> StorageResult<()> {
        self.store.soft_delete::<StoredClient>(client_id)
    }

    /// List live clients of one agent.
    pub fn list_by_agent(&self, agent_id: u64) -> StorageResult<Vec<StoredClient>> {
        self.store
            .find_many(|client: &StoredClient| client.agent_id == agent_id)
    }
}
