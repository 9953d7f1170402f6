// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Message operations.
//!
//! A message names both its agent and its client; the client must belong to
//! that agent when the message is created, and every later read re-checks it.

use chrono::Utc;
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{CreateMessageRequest, UpdateMessageRequest};
use crate::storage::{
    ensure_id, EntityKind, MessageRepository, MessageType, OwnershipResolver, Store,
    StoredMessage,
};

use super::{created, explicit_id, require, require_if_present, require_parent};

const CONTENT_REQUIRED: &str = "message content is required";
const TYPE_REQUIRED: &str = "message type is required";

fn parse_type(value: &str) -> ServiceResult<MessageType> {
    require(value, TYPE_REQUIRED)?;
    value
        .parse()
        .map_err(|_| ServiceError::validation("invalid message type"))
}

#[derive(Clone)]
pub struct MessageService {
    store: Store,
}

impl MessageService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn get_by_id(&self, caller: &CurrentUser, message_id: u64) -> ServiceResult<StoredMessage> {
        ensure_id(message_id, EntityKind::Message)?;
        OwnershipResolver::new(&self.store).authorize_entry::<StoredMessage>(caller, message_id)
    }

    /// Messages of an agent, a client, or both, oldest first.
    pub fn list_by_parent(
        &self,
        caller: &CurrentUser,
        agent_id: Option<u64>,
        client_id: Option<u64>,
    ) -> ServiceResult<Vec<StoredMessage>> {
        OwnershipResolver::new(&self.store).authorize_scope(caller, agent_id, client_id)?;
        Ok(MessageRepository::new(&self.store).list(agent_id, client_id)?)
    }

    pub fn create(
        &self,
        caller: &CurrentUser,
        request: CreateMessageRequest,
    ) -> ServiceResult<StoredMessage> {
        require(&request.content, CONTENT_REQUIRED)?;
        let message_type = parse_type(&request.message_type)?;
        let agent_id = require_parent(request.agent_id, EntityKind::Agent)?;
        let client_id = require_parent(request.client_id, EntityKind::Client)?;
        let id = explicit_id(request.id, EntityKind::Message)?;

        OwnershipResolver::new(&self.store).authorize_new_entry(caller, agent_id, client_id)?;

        let message = created(
            &self.store,
            caller,
            MessageRepository::new(&self.store).create(StoredMessage::new(
                id,
                agent_id,
                client_id,
                request.content,
                message_type,
                request.date.unwrap_or_else(Utc::now),
            )),
            |message: &StoredMessage| message.agent_id,
        )?;
        info!(message_id = message.id, agent_id, client_id, "Message created");
        Ok(message)
    }

    /// Partial update of content, type or date.
    pub fn update(
        &self,
        caller: &CurrentUser,
        message_id: u64,
        request: UpdateMessageRequest,
    ) -> ServiceResult<StoredMessage> {
        ensure_id(message_id, EntityKind::Message)?;
        require_if_present(request.content.as_deref(), CONTENT_REQUIRED)?;
        let message_type = request.message_type.as_deref().map(parse_type).transpose()?;

        OwnershipResolver::new(&self.store).authorize_entry::<StoredMessage>(caller, message_id)?;
        Ok(MessageRepository::new(&self.store).update(message_id, |message| {
            if let Some(content) = request.content {
                message.content = content;
            }
            if let Some(message_type) = message_type {
                message.message_type = message_type;
            }
            if let Some(date) = request.date {
                message.date = date;
            }
        })?)
    }

    pub fn delete(&self, caller: &CurrentUser, message_id: u64) -> ServiceResult<()> {
        ensure_id(message_id, EntityKind::Message)?;
        OwnershipResolver::new(&self.store).authorize_entry::<StoredMessage>(caller, message_id)?;
        MessageRepository::new(&self.store).delete(message_id)?;
        info!(message_id, user_id = caller.id, "Message deleted");
        Ok(())
    }
}
