// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the store.
//!
//! Each repository provides CRUD operations for one entity type. None of
//! them check ownership; callers go through `OwnershipResolver` first.

pub mod agents;
pub mod clients;
pub mod messages;
pub mod transactions;
pub mod users;

pub use agents::{AgentRepository, StoredAgent};
pub use clients::{ClientRepository, StoredClient};
pub use messages::{MessageRepository, MessageType, StoredMessage};
pub use transactions::{StoredTransaction, TransactionRepository};
pub use users::{StoredUser, UserRepository};
