// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    error::{ApiError, ServiceError},
    models::{
        CreateAgentRequest, CreateClientRequest, CreateMessageRequest,
        CreateTransactionRequest, LoginRequest, LoginResponse, MessageResponse,
        RegisterRequest, RegisterResponse, UpdateAgentRequest, UpdateClientRequest,
        UpdateMessageRequest, UpdateTransactionRequest, UserSummary,
    },
    state::AppState,
    storage::{
        EntityKind, MessageType, StoredAgent, StoredClient, StoredMessage, StoredTransaction,
    },
};

pub mod agents;
pub mod auth;
pub mod clients;
pub mod health;
pub mod messages;
pub mod transactions;
pub mod users;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    let protected_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route(
            "/agents",
            get(agents::list_agents).post(agents::create_agent),
        )
        .route(
            "/agents/{id}",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/clients/{id}",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route(
            "/messages/{id}",
            get(messages::get_message)
                .put(messages::update_message)
                .delete(messages::delete_message),
        )
        .route(
            "/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Parse an id taken from the URL path. Zero and non-numeric ids are invalid.
pub(crate) fn parse_path_id(raw: &str, kind: EntityKind) -> Result<u64, ApiError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ServiceError::InvalidId(kind).into()),
    }
}

/// Parse an optional id filter from the query string. Absent or empty means
/// "no filter".
pub(crate) fn parse_query_id(
    raw: Option<&str>,
    kind: EntityKind,
) -> Result<Option<u64>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_path_id(value, kind).map(Some),
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::logout,
        users::get_current_user,
        agents::list_agents,
        agents::get_agent,
        agents::create_agent,
        agents::update_agent,
        agents::delete_agent,
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        messages::list_messages,
        messages::get_message,
        messages::create_message,
        messages::update_message,
        messages::delete_message,
        transactions::list_transactions,
        transactions::get_transaction,
        transactions::create_transaction,
        transactions::update_transaction,
        transactions::delete_transaction,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            UserSummary,
            users::UserMeResponse,
            StoredAgent,
            CreateAgentRequest,
            UpdateAgentRequest,
            StoredClient,
            CreateClientRequest,
            UpdateClientRequest,
            StoredMessage,
            MessageType,
            CreateMessageRequest,
            UpdateMessageRequest,
            StoredTransaction,
            CreateTransactionRequest,
            UpdateTransactionRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "Current user profile"),
        (name = "Agents", description = "Agents owned by the caller"),
        (name = "Clients", description = "Clients of the caller's agents"),
        (name = "Messages", description = "Messages between agents and clients"),
        (name = "Transactions", description = "Monetary transactions with clients"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
