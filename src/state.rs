// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::services::{
    AgentService, AuthService, ClientService, MessageService, TransactionService,
};
use crate::storage::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: Arc<TokenIssuer>,
    pub auth: AuthService,
    pub agents: AgentService,
    pub clients: ClientService,
    pub messages: MessageService,
    pub transactions: TransactionService,
}

impl AppState {
    pub fn new(store: Store, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            auth: AuthService::new(store.clone(), tokens.clone()),
            agents: AgentService::new(store.clone()),
            clients: ClientService::new(store.clone()),
            messages: MessageService::new(store.clone()),
            transactions: TransactionService::new(store.clone()),
            store,
            tokens,
        }
    }
}
