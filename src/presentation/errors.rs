// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::utils::errors::{RunError, StorageError};

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(run_error) = self.0.downcast_ref::<RunError>() {
            return match run_error {
                RunError::AlreadyRunning => StatusCode::CONFLICT,
                RunError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            };
        }
        if let Some(storage_error) = self.0.downcast_ref::<StorageError>() {
            return match storage_error {
                StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                StorageError::InvalidName(_) => StatusCode::BAD_REQUEST,
                StorageError::AlreadyExists(_) => StatusCode::CONFLICT,
                StorageError::Io(_) | StorageError::Metadata(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
        }
        if self.0.downcast_ref::<validator::ValidationErrors>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.0.to_string();
        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        }

        let body = Json(json!({ "status": "error", "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
