// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints. Amounts are signed; zero is rejected.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{parse_path_id, parse_query_id};
use crate::{
    auth::Auth,
    error::{ApiError, ApiJson},
    models::{CreateTransactionRequest, EntryListQuery, UpdateTransactionRequest},
    state::AppState,
    storage::{EntityKind, StoredTransaction},
};

#[utoipa::path(
    get,
    path = "/transactions",
    params(EntryListQuery),
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [StoredTransaction]),
        (status = 400, description = "No filter, invalid id, or client not under agent"),
        (status = 401, description = "Not the caller's agent or client"),
        (status = 404, description = "Agent or client not found")
    )
)]
pub async fn list_transactions(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<Vec<StoredTransaction>>, ApiError> {
    let agent_id = parse_query_id(query.agent_id.as_deref(), EntityKind::Agent)?;
    let client_id = parse_query_id(query.client_id.as_deref(), EntityKind::Client)?;
    Ok(Json(
        state
            .transactions
            .list_by_parent(&user, agent_id, client_id)?,
    ))
}

#[utoipa::path(
    get,
    path = "/transactions/{id}",
    params(("id" = u64, Path, description = "Transaction id")),
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredTransaction),
        (status = 400, description = "Invalid transaction id"),
        (status = 401, description = "Not the caller's transaction"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredTransaction>, ApiError> {
    let id = parse_path_id(&id, EntityKind::Transaction)?;
    Ok(Json(state.transactions.get_by_id(&user, id)?))
}

#[utoipa::path(
    post,
    path = "/transactions",
    request_body = CreateTransactionRequest,
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 201, body = StoredTransaction),
        (status = 400, description = "Missing parent, zero amount, or client not under agent"),
        (status = 401, description = "Not the caller's agent or client"),
        (status = 404, description = "Agent or client not found"),
        (status = 409, description = "Transaction id already in use")
    )
)]
pub async fn create_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<StoredTransaction>), ApiError> {
    let tx = state.transactions.create(&user, request)?;
    Ok((StatusCode::CREATED, Json(tx)))
}

#[utoipa::path(
    put,
    path = "/transactions/{id}",
    params(("id" = u64, Path, description = "Transaction id")),
    request_body = UpdateTransactionRequest,
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StoredTransaction),
        (status = 400, description = "Invalid id or amount"),
        (status = 401, description = "Not the caller's transaction"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn update_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTransactionRequest>,
) -> Result<Json<StoredTransaction>, ApiError> {
    let id = parse_path_id(&id, EntityKind::Transaction)?;
    Ok(Json(state.transactions.update(&user, id, request)?))
}

#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    params(("id" = u64, Path, description = "Transaction id")),
    tag = "Transactions",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 401, description = "Not the caller's transaction"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn delete_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_path_id(&id, EntityKind::Transaction)?;
    state.transactions.delete(&user, id)?;
    Ok(StatusCode::NO_CONTENT)
}
