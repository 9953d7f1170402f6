// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Agent CRM Server - multi-tenant agent/client bookkeeping API
//!
//! Users own agents, agents own clients, and clients accumulate messages and
//! transactions. Every request is authenticated with a bearer token and
//! authorized by walking the ownership chain back to the calling user.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, token issuance and the request gate
//! - `services` - Validation and ownership-checked business operations
//! - `storage` - Embedded redb persistence and the ownership resolver

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
