// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client operations. A client is owned through its agent.

use tracing::info;

use crate::auth::CurrentUser;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{CreateClientRequest, UpdateClientRequest};
use crate::storage::{
    ensure_id, ClientRepository, EntityKind, OwnershipResolver, Store, StoredClient,
};

use super::{created, explicit_id, require, require_if_present, require_parent};

const NAME_REQUIRED: &str = "client name is required";

#[derive(Clone)]
pub struct ClientService {
    store: Store,
}

impl ClientService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn get_by_id(&self, caller: &CurrentUser, client_id: u64) -> ServiceResult<StoredClient> {
        ensure_id(client_id, EntityKind::Client)?;
        OwnershipResolver::new(&self.store).authorize_client(caller, client_id)
    }

    /// Live clients of one of the caller's agents.
    pub fn list_by_parent(
        &self,
        caller: &CurrentUser,
        agent_id: Option<u64>,
    ) -> ServiceResult<Vec<StoredClient>> {
        let agent_id = require_parent(agent_id.unwrap_or(0), EntityKind::Agent)?;
        OwnershipResolver::new(&self.store).authorize_agent(caller, agent_id)?;
        Ok(ClientRepository::new(&self.store).list_by_agent(agent_id)?)
    }

    pub fn create(
        &self,
        caller: &CurrentUser,
        request: CreateClientRequest,
    ) -> ServiceResult<StoredClient> {
        require(&request.name, NAME_REQUIRED)?;
        let agent_id = require_parent(request.agent_id, EntityKind::Agent)?;
        let start_date = request
            .start_date
            .ok_or_else(|| ServiceError::validation("invalid date"))?;
        let score = validate_score(request.score.unwrap_or(0.0))?;
        let id = explicit_id(request.id, EntityKind::Client)?;

        OwnershipResolver::new(&self.store).authorize_agent(caller, agent_id)?;

        let client = created(
            &self.store,
            caller,
            ClientRepository::new(&self.store).create(StoredClient::new(
                id,
                agent_id,
                request.name,
                start_date,
                score,
            )),
            |client: &StoredClient| client.agent_id,
        )?;
        info!(client_id = client.id, agent_id, user_id = caller.id, "Client created");
        Ok(client)
    }

    /// Partial update. The parent agent cannot be changed.
    pub fn update(
        &self,
        caller: &CurrentUser,
        client_id: u64,
        request: UpdateClientRequest,
    ) -> ServiceResult<StoredClient> {
        ensure_id(client_id, EntityKind::Client)?;
        require_if_present(request.name.as_deref(), NAME_REQUIRED)?;
        let score = request.score.map(validate_score).transpose()?;

        OwnershipResolver::new(&self.store).authorize_client(caller, client_id)?;
        Ok(ClientRepository::new(&self.store).update(client_id, |client| {
            if let Some(name) = request.name {
                client.name = name;
            }
            if let Some(start_date) = request.start_date {
                client.start_date = start_date;
            }
            if let Some(score) = score {
                client.score = score;
            }
        })?)
    }

    /// Soft-delete the client only; its messages and transactions stay.
    pub fn delete(&self, caller: &CurrentUser, client_id: u64) -> ServiceResult<()> {
        ensure_id(client_id, EntityKind::Client)?;
        OwnershipResolver::new(&self.store).authorize_client(caller, client_id)?;
        ClientRepository::new(&self.store).delete(client_id)?;
        info!(client_id, user_id = caller.id, "Client deleted");
        Ok(())
    }
}

fn validate_score(score: f64) -> ServiceResult<f64> {
    if score.is_finite() {
        Ok(score)
    } else {
        Err(ServiceError::validation("invalid score"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateAgentRequest;
    use crate::services::test_support::seed_user;
    use crate::services::AgentService;
    use crate::storage::database::tests::temp_store;
    use crate::storage::StoredAgent;
    use chrono::Utc;

    fn seed_agent(store: &Store, caller: &CurrentUser) -> StoredAgent {
        AgentService::new(store.clone())
            .create(
                caller,
                CreateAgentRequest {
                    id: None,
                    name: "Ada".to_string(),
                    characteristics: "friendly".to_string(),
                },
            )
            .unwrap()
    }

    fn create_request(agent_id: u64) -> CreateClientRequest {
        CreateClientRequest {
            id: None,
            agent_id,
            name: "Acme".to_string(),
            start_date: Some(Utc::now()),
            score: None,
        }
    }

    #[test]
    fn create_validates_in_order() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let clients = ClientService::new(store);

        let err = clients.create(&alice, CreateClientRequest::default()).unwrap_err();
        assert_eq!(err.to_string(), "client name is required");

        let mut req = create_request(0);
        let err = clients.create(&alice, req.clone()).unwrap_err();
        assert_eq!(err.to_string(), "agent ID is required");

        req.agent_id = 1;
        req.start_date = None;
        let err = clients.create(&alice, req).unwrap_err();
        assert_eq!(err.to_string(), "invalid date");
    }

    #[test]
    fn create_defaults_score_and_checks_agent_owner() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let bob = seed_user(&store, "bob");
        let agent = seed_agent(&store, &alice);
        let clients = ClientService::new(store);

        let client = clients.create(&alice, create_request(agent.id)).unwrap();
        assert_eq!(client.agent_id, agent.id);
        assert_eq!(client.score, 0.0);

        assert!(matches!(
            clients.create(&bob, create_request(agent.id)),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            clients.create(&alice, create_request(999)),
            Err(ServiceError::NotFound(EntityKind::Agent))
        ));
    }

    #[test]
    fn ownership_is_transitive_through_agent() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let bob = seed_user(&store, "bob");
        let agent = seed_agent(&store, &alice);
        let clients = ClientService::new(store);
        let client = clients.create(&alice, create_request(agent.id)).unwrap();

        assert!(clients.get_by_id(&alice, client.id).is_ok());
        assert!(matches!(
            clients.get_by_id(&bob, client.id),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            clients.list_by_parent(&bob, Some(agent.id)),
            Err(ServiceError::Unauthorized)
        ));
        assert_eq!(clients.list_by_parent(&alice, Some(agent.id)).unwrap().len(), 1);
    }

    #[test]
    fn listing_requires_agent_id() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let clients = ClientService::new(store);

        let err = clients.list_by_parent(&alice, None).unwrap_err();
        assert_eq!(err.to_string(), "agent ID is required");
    }

    #[test]
    fn deleting_agent_keeps_client_reachable() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let agent = seed_agent(&store, &alice);
        let clients = ClientService::new(store.clone());
        let client = clients.create(&alice, create_request(agent.id)).unwrap();

        AgentService::new(store).delete(&alice, agent.id).unwrap();

        assert!(clients.get_by_id(&alice, client.id).is_ok());
        assert!(matches!(
            clients.list_by_parent(&alice, Some(agent.id)),
            Err(ServiceError::NotFound(EntityKind::Agent))
        ));
    }

    #[test]
    fn update_and_delete() {
        let (store, _dir) = temp_store();
        let alice = seed_user(&store, "alice");
        let agent = seed_agent(&store, &alice);
        let clients = ClientService::new(store);
        let client = clients.create(&alice, create_request(agent.id)).unwrap();

        let updated = clients
            .update(
                &alice,
                client.id,
                UpdateClientRequest {
                    score: Some(4.5),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.score, 4.5);
        assert_eq!(updated.name, "Acme");

        clients.delete(&alice, client.id).unwrap();
        assert!(matches!(
            clients.delete(&alice, client.id),
            Err(ServiceError::NotFound(EntityKind::Client))
        ));
    }
}
