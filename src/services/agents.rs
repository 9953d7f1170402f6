// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Agent operations, scoped to the calling user.

use tracing::info;

use crate::auth::CurrentUser;
use crate::error::ServiceResult;
use crate::models::{CreateAgentRequest, UpdateAgentRequest};
use crate::storage::{
    ensure_id, AgentRepository, EntityKind, OwnershipResolver, Store, StoredAgent,
};

use super::{created, explicit_id, require, require_if_present};

const NAME_REQUIRED: &str = "agent name is required";
const CHARACTERISTICS_REQUIRED: &str = "agent characteristics are required";

#[derive(Clone)]
pub struct AgentService {
    store: Store,
}

impl AgentService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn get_by_id(&self, caller: &CurrentUser, agent_id: u64) -> ServiceResult<StoredAgent> {
        ensure_id(agent_id, EntityKind::Agent)?;
        OwnershipResolver::new(&self.store).authorize_agent(caller, agent_id)
    }

    /// All live agents of the caller.
    pub fn list_by_parent(&self, caller: &CurrentUser) -> ServiceResult<Vec<StoredAgent>> {
        Ok(AgentRepository::new(&self.store).list_by_owner(caller.id)?)
    }

    pub fn create(
        &self,
        caller: &CurrentUser,
        request: CreateAgentRequest,
    ) -> ServiceResult<StoredAgent> {
        require(&request.name, NAME_REQUIRED)?;
        require(&request.characteristics, CHARACTERISTICS_REQUIRED)?;
        let id = explicit_id(request.id, EntityKind::Agent)?;

        let agent = created(
            &self.store,
            caller,
            AgentRepository::new(&self.store).create(StoredAgent::new(
                id,
                caller.id,
                request.name,
                request.characteristics,
            )),
            |agent: &StoredAgent| agent.id,
        )?;
        info!(agent_id = agent.id, user_id = caller.id, "Agent created");
        Ok(agent)
    }

    /// Partial update: only supplied fields change.
    pub fn update(
        &self,
        caller: &CurrentUser,
        agent_id: u64,
        request: UpdateAgentRequest,
    ) -> ServiceResult<StoredAgent> {
        ensure_id(agent_id, EntityKind::Agent)?;
        require_if_present(request.name.as_deref(), NAME_REQUIRED)?;
        require_if_present(request.characteristics.as_deref(), CHARACTERISTICS_REQUIRED)?;

        OwnershipResolver::new(&self.store).authorize_agent(caller, agent_id)?;
        Ok(AgentRepository::new(&self.store).update(agent_id, |agent| {
            if let Some(name) = request.name {
                agent.name = name;
            }
            if let Some(characteristics) = request.characteristics {
                agent.characteristics = characteristics;
            }
        })?)
    }

    /// Soft-delete the agent only; its clients and entries stay.
    pub fn delete(&self, caller: &CurrentUser, agent_id: u64) -> ServiceResult<()> {
        ensure_id(agent_id, EntityKind::Agent)?;
        OwnershipResolver::new(&self.store).authorize_agent(caller, agent_id)?;
        AgentRepository::new(&self.store).delete(agent_id)?;
        info!(agent_id, user_id = caller.id, "Agent deleted");
        Ok(())
    }
}
