// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client endpoints. Clients hang off an agent.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{parse_path_id, parse_query_id};
use crate::{
    auth::Auth,
    error::{ApiError, ApiJson},
    models::{ClientListQuery, CreateClientRequest, UpdateClientRequest},
    state::AppState,
    storage::{EntityKind, StoredClient},
};

/// List the clients of one of the caller's agents.
#[utoipa::path(
    get,
    path = "/clients",
    params(ClientListQuery),
    tag = "Clients",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [StoredClient]),
        (status = 400, description = "Missing or invalid agent id"),
        (status = 401, description = "Not the caller's agent"),
        (status = 404, description = "Agent not found")
    )
)]
pub async fn list_clients(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Vec<StoredClient>>, ApiError> {
    let agent_id = parse_query_id(query.agent_id.as_deref(), EntityKind::Agent)?;
    Ok(Json(state.clients.list_by_parent(&user, agent_id)?))
}

#[utoipa::path(
    get,
    path = "/clients/{id}",
    params(("id" = u64, Path, description = "Client id")),
    tag = "Clients",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredClient),
        (status = 400, description = "Invalid client id"),
        (status = 401, description = "Not the caller's client"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredClient>, ApiError> {
    let id = parse_path_id(&id, EntityKind::Client)?;
    Ok(Json(state.clients.get_by_id(&user, id)?))
}

#[utoipa::path(
    post,
    path = "/clients",
    request_body = CreateClientRequest,
    tag = "Clients",
    security(("bearer" = [])),
    responses(
        (status = 201, body = StoredClient),
        (status = 400, description = "Missing name, agent id or start date"),
        (status = 401, description = "Not the caller's agent"),
        (status = 404, description = "Agent not found"),
        (status = 409, description = "Client id already in use")
    )
)]
pub async fn create_client(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<StoredClient>), ApiError> {
    let client = state.clients.create(&user, request)?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    put,
    path = "/clients/{id}",
    params(("id" = u64, Path, description = "Client id")),
    request_body = UpdateClientRequest,
    tag = "Clients",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredClient),
        (status = 400, description = "Invalid id or field"),
        (status = 401, description = "Not the caller's client"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn update_client(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateClientRequest>,
) -> Result<Json<StoredClient>, ApiError> {
    let id = parse_path_id(&id, EntityKind::Client)?;
    Ok(Json(state.clients.update(&user, id, request)?))
}

#[utoipa::path(
    delete,
    path = "/clients/{id}",
    params(("id" = u64, Path, description = "Client id")),
    tag = "Clients",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 401, description = "Not the caller's client"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn delete_client(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_path_id(&id, EntityKind::Client)?;
    state.clients.delete(&user, id)?;
    Ok(StatusCode::NO_CONTENT)
}
