// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction operations. Same ownership rules as messages.

use chrono::Utc;
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{CreateTransactionRequest, UpdateTransactionRequest};
use crate::storage::{
    ensure_id, EntityKind, OwnershipResolver, Store, StoredTransaction, TransactionRepository,
};

use super::{created, explicit_id, require_parent};

/// Amounts are signed, finite and never zero.
fn validate_amount(amount: f64) -> ServiceResult<f64> {
    if amount == 0.0 {
        Err(ServiceError::validation("transaction amount is required"))
    } else if !amount.is_finite() {
        Err(ServiceError::validation("invalid amount"))
    } else {
        Ok(amount)
    }
}

#[derive(Clone)]
pub struct TransactionService {
    store: Store,
}

impl TransactionService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn get_by_id(&self, caller: &CurrentUser, tx_id: u64) -> ServiceResult<StoredTransaction> {
        ensure_id(tx_id, EntityKind::Transaction)?;
        OwnershipResolver::new(&self.store).authorize_entry::<StoredTransaction>(caller, tx_id)
    }

    /// Transactions of an agent, a client, or both, in id order.
    pub fn list_by_parent(
        &self,
        caller: &CurrentUser,
        agent_id: Option<u64>,
        client_id: Option<u64>,
    ) -> ServiceResult<Vec<StoredTransaction>> {
        OwnershipResolver::new(&self.store).authorize_scope(caller, agent_id, client_id)?;
        Ok(TransactionRepository::new(&self.store).list(agent_id, client_id)?)
    }

    pub fn create(
        &self,
        caller: &CurrentUser,
        request: CreateTransactionRequest,
    ) -> ServiceResult<StoredTransaction> {
        let agent_id = require_parent(request.agent_id, EntityKind::Agent)?;
        let client_id = require_parent(request.client_id, EntityKind::Client)?;
        let amount = validate_amount(request.amount)?;
        let id = explicit_id(request.id, EntityKind::Transaction)?;

        OwnershipResolver::new(&self.store).authorize_new_entry(caller, agent_id, client_id)?;

        let tx = created(
            &self.store,
            caller,
            TransactionRepository::new(&self.store).create(StoredTransaction::new(
                id,
                agent_id,
                client_id,
                amount,
                request.date.unwrap_or_else(Utc::now),
            )),
            |tx: &StoredTransaction| tx.agent_id,
        )?;
        info!(tx_id = tx.id, agent_id, client_id, amount, "Transaction created");
        Ok(tx)
    }

    pub fn update(
        &self,
        caller: &CurrentUser,
        tx_id: u64,
        request: UpdateTransactionRequest,
    ) -> ServiceResult<StoredTransaction> {
        ensure_id(tx_id, EntityKind::Transaction)?;
        let amount = request.amount.map(validate_amount).transpose()?;

        OwnershipResolver::new(&self.store).authorize_entry::<StoredTransaction>(caller, tx_id)?;
        Ok(TransactionRepository::new(&self.store).update(tx_id, |tx| {
            if let Some(amount) = amount {
                tx.amount = amount;
            }
            if let Some(date) = request.date {
                tx.date = date;
            }
        })?)
    }

    pub fn delete(&self, caller: &CurrentUser, tx_id: u64) -> ServiceResult<()> {
        ensure_id(tx_id, EntityKind::Transaction)?;
        OwnershipResolver::new(&self.store).authorize_entry::<StoredTransaction>(caller, tx_id)?;
        TransactionRepository::new(&self.store).delete(tx_id)?;
        info!(tx_id, user_id = caller.id, "Transaction deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::seed_user;
    use crate::storage::database::tests::temp_store;
    use crate::storage::{AgentRepository, ClientRepository, StoredAgent, StoredClient};

    fn seed_chain(store: &Store, caller: &CurrentUser) -> (StoredAgent, StoredClient) {
        let agent = AgentRepository::new(store)
            .create(StoredAgent::new(0, caller.id, "Ada".into(), "kind".into()))
            .unwrap();
        let client = ClientRepository::new(store)
            .create(StoredClient::new(0, agent.id, "Acme".into(), Utc::now(), 0.0))
            .unwrap();
        (agent, client)
    }

    fn create_request(agent_id: u64, client_id: u64, amount: f64) -> CreateTransactionRequest {
        CreateTransactionRequest {
            id: None,
            agent_id,
            client_id,
            amount,
            date: None,
        }
    }

    #[test]
    fn zero_amount_is_rejected() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let (agent, client) = seed_chain(&store, &alice);
        let txs = TransactionService::new(store);

        let err = txs
            .create(&alice, create_request(agent.id, client.id, 0.0))
            .unwrap_err();
        assert_eq!(err.to_string(), "transaction amount is required");

        let tx = txs
            .create(&alice, create_request(agent.id, client.id, 100.50))
            .unwrap();
        assert_eq!(tx.amount, 100.50);
        assert_eq!(tx.client_id, client.id);
    }

    #[test]
    fn negative_amounts_are_allowed() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let (agent, client) = seed_chain(&store, &alice);
        let txs = TransactionService::new(store);

        let refund = txs
            .create(&alice, create_request(agent.id, client.id, -25.0))
            .unwrap();
        assert_eq!(refund.amount, -25.0);
    }

    #[test]
    fn create_rejects_client_of_another_agent() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let (first_agent, _) = seed_chain(&store, &alice);
        let (_, second_client) = seed_chain(&store, &alice);
        let txs = TransactionService::new(store);

        assert!(matches!(
            txs.create(&alice, create_request(first_agent.id, second_client.id, 10.0)),
            Err(ServiceError::RelationshipInconsistent)
        ));
        assert!(txs
            .list_by_parent(&alice, None, Some(second_client.id))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn foreign_user_is_unauthorized_everywhere() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let bob = seed_user(&store, "bob");
        let (agent, client) = seed_chain(&store, &alice);
        let txs = TransactionService::new(store);
        let tx = txs
            .create(&alice, create_request(agent.id, client.id, 10.0))
            .unwrap();

        assert!(matches!(txs.get_by_id(&bob, tx.id), Err(ServiceError::Unauthorized)));
        assert!(matches!(
            txs.update(&bob, tx.id, UpdateTransactionRequest::default()),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(txs.delete(&bob, tx.id), Err(ServiceError::Unauthorized)));
        assert!(matches!(
            txs.list_by_parent(&bob, Some(agent.id), None),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn update_rejects_zero_and_keeps_date() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let (agent, client) = seed_chain(&store, &alice);
        let txs = TransactionService::new(store);
        let tx = txs
            .create(&alice, create_request(agent.id, client.id, 10.0))
            .unwrap();

        let err = txs
            .update(
                &alice,
                tx.id,
                UpdateTransactionRequest {
                    amount: Some(0.0),
                    date: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "transaction amount is required");

        let updated = txs
            .update(
                &alice,
                tx.id,
                UpdateTransactionRequest {
                    amount: Some(12.0),
                    date: None,
                },
            )
            .unwrap();
        assert_eq!(updated.amount, 12.0);
        assert_eq!(updated.date, tx.date);
    }

    #[test]
    fn list_by_client_only() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let (agent, client) = seed_chain(&store, &alice);
        let (_, other_client) = seed_chain(&store, &alice);
        let txs = TransactionService::new(store);

        txs.create(&alice, create_request(agent.id, client.id, 1.0)).unwrap();
        txs.create(&alice, create_request(agent.id, client.id, 2.0)).unwrap();

        assert_eq!(txs.list_by_parent(&alice, None, Some(client.id)).unwrap().len(), 2);
        assert!(txs
            .list_by_parent(&alice, None, Some(other_client.id))
            .unwrap()
            .is_empty());
    }
}
