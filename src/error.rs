// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::{EntityKind, StorageError};

// =============================================================================
// Service Errors
// =============================================================================

/// Domain failures raised by the service layer and the ownership rules.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A required field is missing or a value is out of range.
    #[error("{0}")]
    Validation(String),

    /// Zero or unparsable identifier.
    #[error("{0} ID is invalid")]
    InvalidId(EntityKind),

    #[error("{0} not found")]
    NotFound(EntityKind),

    /// The caller does not own the addressed resource.
    #[error("unauthorized access")]
    Unauthorized,

    #[error("{0} already exists")]
    AlreadyExists(EntityKind),

    #[error("username taken")]
    UsernameTaken,

    #[error("email already taken")]
    EmailTaken,

    #[error("invalid credentials")]
    InvalidCredentials,

    /// A message or transaction references a client of another agent.
    #[error("client does not belong to this agent")]
    RelationshipInconsistent,

    #[error("storage error: {0}")]
    Storage(StorageError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { kind, .. } => ServiceError::NotFound(kind),
            StorageError::AlreadyExists { kind, .. } => ServiceError::AlreadyExists(kind),
            StorageError::UniqueViolation { field: "username" } => ServiceError::UsernameTaken,
            StorageError::UniqueViolation { field: "email" } => ServiceError::EmailTaken,
            other => ServiceError::Storage(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// HTTP Errors
// =============================================================================

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Validation(_)
            | ServiceError::InvalidId(_)
            | ServiceError::RelationshipInconsistent => Self::bad_request(err.to_string()),
            ServiceError::Unauthorized | ServiceError::InvalidCredentials => {
                Self::unauthorized(err.to_string())
            }
            ServiceError::NotFound(_) => Self::not_found(err.to_string()),
            ServiceError::AlreadyExists(_)
            | ServiceError::UsernameTaken
            | ServiceError::EmailTaken => Self::conflict(err.to_string()),
            ServiceError::Storage(_) | ServiceError::Internal(_) => {
                tracing::error!(error = %err, "Request failed");
                Self::internal("internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// JSON body extractor whose rejections use the `{ "error": ... }` shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
