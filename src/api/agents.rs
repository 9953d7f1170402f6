// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Agent endpoints. Every agent belongs to exactly one user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::parse_path_id;
use crate::{
    auth::Auth,
    error::{ApiError, ApiJson},
    models::{CreateAgentRequest, UpdateAgentRequest},
    state::AppState,
    storage::{EntityKind, StoredAgent},
};

/// List the caller's agents.
#[utoipa::path(
    get,
    path = "/agents",
    tag = "Agents",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [StoredAgent]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_agents(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredAgent>>, ApiError> {
    Ok(Json(state.agents.list_by_parent(&user)?))
}

#[utoipa::path(
    get,
    path = "/agents/{id}",
    params(("id" = u64, Path, description = "Agent id")),
    tag = "Agents",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredAgent),
        (status = 400, description = "Invalid agent id"),
        (status = 401, description = "Not the caller's agent"),
        (status = 404, description = "Agent not found")
    )
)]
pub async fn get_agent(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredAgent>, ApiError> {
    let id = parse_path_id(&id, EntityKind::Agent)?;
    Ok(Json(state.agents.get_by_id(&user, id)?))
}

#[utoipa::path(
    post,
    path = "/agents",
    request_body = CreateAgentRequest,
    tag = "Agents",
    security(("bearer" = [])),
    responses(
        (status = 201, body = StoredAgent),
        (status = 400, description = "Missing name or characteristics"),
        (status = 409, description = "Agent id already in use")
    )
)]
pub async fn create_agent(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAgentRequest>,
) -> Result<(StatusCode, Json<StoredAgent>), ApiError> {
    let agent = state.agents.create(&user, request)?;
    Ok((StatusCode::CREATED, Json(agent)))
}

#[utoipa::path(
    put,
    path = "/agents/{id}",
    params(("id" = u64, Path, description = "Agent id")),
    request_body = UpdateAgentRequest,
    tag = "Agents",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredAgent),
        (status = 400, description = "Invalid id or empty field"),
        (status = 401, description = "Not the caller's agent"),
        (status = 404, description = "Agent not found")
    )
)]
pub async fn update_agent(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateAgentRequest>,
) -> Result<Json<StoredAgent>, ApiError> {
    let id = parse_path_id(&id, EntityKind::Agent)?;
    Ok(Json(state.agents.update(&user, id, request)?))
}

/// Soft delete. Clients of the agent are left in place.
#[utoipa::path(
    delete,
    path = "/agents/{id}",
    params(("id" = u64, Path, description = "Agent id")),
    tag = "Agents",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Agent deleted"),
        (status = 401, description = "Not the caller's agent"),
        (status = 404, description = "Agent not found")
    )
)]
pub async fn delete_agent(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_path_id(&id, EntityKind::Agent)?;
    state.agents.delete(&user, id)?;
    Ok(StatusCode::NO_CONTENT)
}
