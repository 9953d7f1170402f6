// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Message endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{parse_path_id, parse_query_id};
use crate::{
    auth::Auth,
    error::{ApiError, ApiJson},
    models::{CreateMessageRequest, EntryListQuery, UpdateMessageRequest},
    state::AppState,
    storage::{EntityKind, StoredMessage},
};

/// Messages filtered by agent, client, or both. Oldest first.
#[utoipa::path(
    get,
    path = "/messages",
    params(EntryListQuery),
    tag = "Messages",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [StoredMessage]),
        (status = 400, description = "No filter, invalid id, or client not under agent"),
        (status = 401, description = "Not the caller's agent or client"),
        (status = 404, description = "Agent or client not found")
    )
)]
pub async fn list_messages(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<Vec<StoredMessage>>, ApiError> {
    let agent_id = parse_query_id(query.agent_id.as_deref(), EntityKind::Agent)?;
    let client_id = parse_query_id(query.client_id.as_deref(), EntityKind::Client)?;
    Ok(Json(state.messages.list_by_parent(&user, agent_id, client_id)?))
}

#[utoipa::path(
    get,
    path = "/messages/{id}",
    params(("id" = u64, Path, description = "Message id")),
    tag = "Messages",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredMessage),
        (status = 400, description = "Invalid message id"),
        (status = 401, description = "Not the caller's message"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn get_message(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredMessage>, ApiError> {
    let id = parse_path_id(&id, EntityKind::Message)?;
    Ok(Json(state.messages.get_by_id(&user, id)?))
}

#[utoipa::path(
    post,
    path = "/messages",
    request_body = CreateMessageRequest,
    tag = "Messages",
    security(("bearer" = [])),
    responses(
        (status = 201, body = StoredMessage),
        (status = 400, description = "Missing content, bad type, or client not under agent"),
        (status = 401, description = "Not the caller's agent or client"),
        (status = 404, description = "Agent or client not found"),
        (status = 409, description = "Message id already in use")
    )
)]
pub async fn create_message(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateMessageRequest>,
) -> Result<(StatusCode, Json<StoredMessage>), ApiError> {
    let message = state.messages.create(&user, request)?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    put,
    path = "/messages/{id}",
    params(("id" = u64, Path, description = "Message id")),
    request_body = UpdateMessageRequest,
    tag = "Messages",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredMessage),
        (status = 400, description = "Invalid id or field"),
        (status = 401, description = "Not the caller's message"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn update_message(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateMessageRequest>,
) -> Result<Json<StoredMessage>, ApiError> {
    let id = parse_path_id(&id, EntityKind::Message)?;
    Ok(Json(state.messages.update(&user, id, request)?))
}

#[utoipa::path(
    delete,
    path = "/messages/{id}",
    params(("id" = u64, Path, description = "Message id")),
    tag = "Messages",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 401, description = "Not the caller's message"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn delete_message(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_path_id(&id, EntityKind::Message)?;
    state.messages.delete(&user, id)?;
    Ok(StatusCode::NO_CONTENT)
}
