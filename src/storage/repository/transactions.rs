// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction repository.
//!
//! Transactions are monetary entries between an agent and one of its
//! clients. Amounts are signed and never zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::TRANSACTIONS;
use super::super::{ClientScoped, EntityKind, Store, StorageResult};

/// Transaction as persisted and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StoredTransaction {
    pub id: u64,
    pub agent_id: u64,
    pub client_id: u64,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

crate::impl_record!(StoredTransaction, EntityKind::Transaction, TRANSACTIONS);

impl ClientScoped for StoredTransaction {
    fn agent_id(&self) -> u64 {
        self.agent_id
    }

    fn client_id(&self) -> u64 {
        self.client_id
    }
}

impl StoredTransaction {
    pub fn new(id: u64, agent_id: u64, client_id: u64, amount: f64, date: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id,
            agent_id,
            client_id,
            amount,
            date,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Repository for transaction operations.
pub struct TransactionRepository<'a> {
    store: &'a Store,
}

impl<'a> TransactionRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get(&self, tx_id: u64) -> StorageResult<Option<StoredTransaction>> {
        self.store.find(tx_id)
    }

    pub fn create(&self, tx: StoredTransaction) -> StorageResult<StoredTransaction> {
        self.store.insert(tx)
    }

    pub fn update<F>(&self, tx_id: u64, change: F) -> StorageResult<StoredTransaction>
    where
        F: FnOnce(&mut StoredTransaction),
    {
        self.store.update(tx_id, change)
    }

    pub fn delete(&self, tx_id: u64) -> StorageResult<()> {
        self.store.soft_delete::<StoredTransaction>(tx_id)
    }

    /// List live transactions in id order.
    pub fn list(
        &self,
        agent_id: Option<u64>,
        client_id: Option<u64>,
    ) -> StorageResult<Vec<StoredTransaction>> {
        self.store.find_many(|tx: &StoredTransaction| {
            agent_id.is_none_or(|id| tx.agent_id == id)
                && client_id.is_none_or(|id| tx.client_id == id)
        })
    }
}
