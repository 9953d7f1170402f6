// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies used by the REST API. Stored records
//! (`StoredAgent`, `StoredClient`, ...) double as response bodies and live in
//! the storage layer.
//!
//! ## Required Fields
//!
//! Create requests default every field instead of failing deserialization,
//! so a missing field and an empty one produce the same validation message
//! (e.g. `"agent name is required"`). Update requests use `Option`: only the
//! fields present in the body change.
//!
//! ## Model Categories
//!
//! - **Auth**: registration, login, logout
//! - **Agents / Clients**: create and partial update
//! - **Messages / Transactions**: create, partial update, listing filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Auth Models
// =============================================================================

/// Account registration.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public identity of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserSummary {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    pub user: UserSummary,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Agent Models
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateAgentRequest {
    /// Optional explicit id. Creating over an existing id fails with 409.
    pub id: Option<u64>,
    pub name: String,
    pub characteristics: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub characteristics: Option<String>,
}

// =============================================================================
// Client Models
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateClientRequest {
    pub id: Option<u64>,
    /// Parent agent; must be owned by the caller.
    pub agent_id: u64,
    pub name: String,
    /// RFC 3339 timestamp.
    pub start_date: Option<DateTime<Utc>>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub score: Option<f64>,
}

/// Query for `GET /clients`. Ids arrive as text so a malformed one can be
/// reported as an invalid id rather than a query rejection.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientListQuery {
    /// Agent whose clients to list.
    pub agent_id: Option<String>,
}

// =============================================================================
// Message Models
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateMessageRequest {
    pub id: Option<u64>,
    pub agent_id: u64,
    pub client_id: u64,
    pub content: String,
    /// `AGENT_TO_CLIENT` or `CLIENT_TO_AGENT`.
    #[serde(rename = "type")]
    pub message_type: String,
    /// Defaults to the time of creation.
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateMessageRequest {
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

// =============================================================================
// Transaction Models
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateTransactionRequest {
    pub id: Option<u64>,
    pub agent_id: u64,
    pub client_id: u64,
    /// Signed amount; zero is rejected.
    pub amount: f64,
    /// Defaults to the time of creation.
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateTransactionRequest {
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
}

/// Query for `GET /messages` and `GET /transactions`.
///
/// At least one filter is required; with both, the client must belong to
/// the agent.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EntryListQuery {
    pub agent_id: Option<String>,
    pub client_id: Option<String>,
}
