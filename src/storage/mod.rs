// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage on an embedded **redb** database.
//!
//! ## Layout
//!
//! ```text
//! {DATA_DIR}/agent-crm.redb
//!   users, agents, clients, messages, transactions   # id → JSON record
//!   sequences                                        # table → last id
//!   users_by_username, users_by_email                # unique indexes
//! ```
//!
//! ## Important Notes
//!
//! - Rows are soft-deleted and never removed
//! - Every operation is its own redb transaction
//! - Ownership is checked in [`ownership`], not in the repositories

pub mod database;
pub mod ownership;
pub mod repository;

pub use database::{EntityKind, Record, Store, StorageError, StorageResult, UniqueKey};
pub use ownership::{ensure_id, ClientScoped, OwnershipResolver};
pub use repository::{
    AgentRepository, ClientRepository, MessageRepository, MessageType, StoredAgent, StoredClient,
    StoredMessage, StoredTransaction, StoredUser, TransactionRepository, UserRepository,
};
