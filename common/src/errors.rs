//! Error taxonomy shared by every layer of the service.
//!
//! Nothing is recovered locally: errors propagate with `?` up to the HTTP
//! layer, where they are logged in full and rendered as a generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ApiResponse;

/// Result alias used throughout the service.
pub type AppResult<T> = Result<T, AppError>;

/// Application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Query template is missing, or the name points outside the template directory.
    #[error("query template not found: {0}")]
    TemplateNotFound(String),

    /// Query template exists but could not be read.
    #[error("failed to read query template {name}: {source}")]
    TemplateIo {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Graph database unreachable, query rejected, or response unusable.
    #[error("remote query failed: {0}")]
    RemoteQuery(String),

    /// Invalid startup configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Stable error code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            AppError::TemplateIo { .. } => "TEMPLATE_IO_ERROR",
            AppError::RemoteQuery(_) => "REMOTE_QUERY_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(code = self.code(), error = %self, "请求处理失败");

        // 不向调用方暴露模板内容或远端诊断信息
        let body = ApiResponse::err("INTERNAL_ERROR", "internal server error");
        (self.status_code(), Json(body)).into_response()
    }
}
