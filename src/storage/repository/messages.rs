// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Message repository.
//!
//! A message records one exchange between an agent and one of its clients.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::MESSAGES;
use super::super::{ClientScoped, EntityKind, Store, StorageResult};

/// Direction of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    AgentToClient,
    ClientToAgent,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::AgentToClient => "AGENT_TO_CLIENT",
            MessageType::ClientToAgent => "CLIENT_TO_AGENT",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AGENT_TO_CLIENT" => Ok(MessageType::AgentToClient),
            "CLIENT_TO_AGENT" => Ok(MessageType::ClientToAgent),
            _ => Err(()),
        }
    }
}

/// Message as persisted and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StoredMessage {
    pub id: u64,
    pub agent_id: u64,
    pub client_id: u64,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

crate::impl_record!(StoredMessage, EntityKind::Message, MESSAGES);

impl ClientScoped for StoredMessage {
    fn agent_id(&self) -> u64 {
        self.agent_id
    }

    fn client_id(&self) -> u64 {
        self.client_id
    }
}

impl StoredMessage {
    pub fn new(
        id: u64,
        agent_id: u64,
        client_id: u64,
        content: String,
        message_type: MessageType,
        date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            agent_id,
            client_id,
            content,
            message_type,
            date,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Repository for message operations.
pub struct MessageRepository<'a> {
    store: &'a Store,
}

impl<'a> MessageRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get(&self, message_id: u64) -> StorageResult<Option<StoredMessage>> {
        self.store.find(message_id)
    }

    pub fn create(&self, message: StoredMessage) -> StorageResult<StoredMessage> {
        self.store.insert(message)
    }

    pub fn update<F>(&self, message_id: u64, change: F) -> StorageResult<StoredMessage>
    where
        F: FnOnce(&mut StoredMessage),
    {
        self.store.update(message_id, change)
    }

    pub fn delete(&self, message_id: u64) -> StorageResult<()> {
        self.store.soft_delete::<StoredMessage>(message_id)
    }

    /// List live messages, oldest first.
    ///
    /// Each filter that is `Some` must match.
    pub fn list(
        &self,
        agent_id: Option<u64>,
        client_id: Option<u64>,
    ) -> StorageResult<Vec<StoredMessage>> {
        let mut messages = self.store.find_many(|message: &StoredMessage| {
            agent_id.is_none_or(|id| message.agent_id == id)
                && client_id.is_none_or(|id| message.client_id == id)
        })?;
        messages.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::tests::temp_store;
    use chrono::Duration;

    fn test_message(agent_id: u64, client_id: u64, date: DateTime<Utc>) -> StoredMessage {
        StoredMessage::new(
            0,
            agent_id,
            client_id,
            "hello".to_string(),
            MessageType::AgentToClient,
            date,
        )
    }

    #[test]
    fn message_type_wire_format() {
        assert_eq!(
            serde_json::to_value(MessageType::ClientToAgent).unwrap(),
            "CLIENT_TO_AGENT"
        );
        assert_eq!(
            "AGENT_TO_CLIENT".parse::<MessageType>(),
            Ok(MessageType::AgentToClient)
        );
        assert!("agent_to_client".parse::<MessageType>().is_err());
    }

    #[test]
    fn serializes_type_field() {
        let json = serde_json::to_value(test_message(1, 2, Utc::now())).unwrap();
        assert_eq!(json["type"], "AGENT_TO_CLIENT");
        assert!(json.get("message_type").is_none());
    }

    #[test]
    fn list_orders_by_date() {
        let (store, _dir) = temp_store();
        let repo = MessageRepository::new(&store);
        let now = Utc::now();

        let late = repo.create(test_message(1, 1, now)).unwrap();
        let early = repo.create(test_message(1, 1, now - Duration::days(1))).unwrap();

        let listed = repo.list(Some(1), None).unwrap();
        let ids: Vec<u64> = listed.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
    }

    #[test]
    fn list_applies_both_filters() {
        let (store, _dir) = temp_store();
        let repo = MessageRepository::new(&store);
        let now = Utc::now();

        repo.create(test_message(1, 1, now)).unwrap();
        repo.create(test_message(1, 2, now)).unwrap();
        repo.create(test_message(2, 3, now)).unwrap();

        assert_eq!(repo.list(Some(1), None).unwrap().len(), 2);
        assert_eq!(repo.list(Some(1), Some(2)).unwrap().len(), 1);
        assert_eq!(repo.list(None, Some(3)).unwrap().len(), 1);
        assert!(repo.list(Some(2), Some(1)).unwrap().is_empty());
    }
}
