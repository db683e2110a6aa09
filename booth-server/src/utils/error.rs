//! 统一错误处理
//!
//! [`AppError`] 是处理器和服务层的错误类型，实现 `IntoResponse`，
//! 所有错误路径都返回结构化 JSON：
//!
//! ```json
//! { "error": "Print request not found: ghost", "code": "not_found" }
//! ```
//!
//! # 状态码
//!
//! | 变体 | HTTP | code |
//! |------|------|------|
//! | Validation | 400 | validation_error |
//! | NotFound | 404 | not_found |
//! | InvalidTransition | 409 | invalid_transition |
//! | Conflict | 409 | conflict |
//! | PrintFailed | 500 | print_failed |
//! | PrintTimeout | 504 | print_timeout |
//! | Storage | 500 | storage_error |
//! | Internal | 500 | internal_error |

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::response::ErrorBody;
use tracing::error;

use crate::printing::StorageError;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 客户端错误 (4xx) ==========
    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Invalid status transition: {0}")]
    /// 状态迁移不合法 (409)
    InvalidTransition(String),

    #[error("Resource conflict: {0}")]
    /// 资源冲突 (409)
    Conflict(String),

    // ========== 打印错误 (5xx) ==========
    #[error("Printing failed: {0}")]
    /// 打印机返回失败 (500)
    PrintFailed(String),

    #[error("Printing timed out: {0}")]
    /// 打印机超时 (504)
    PrintTimeout(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Storage error: {0}")]
    /// 存储错误 (500)
    Storage(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PrintTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::PrintFailed(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable error kind
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidTransition(_) => "invalid_transition",
            AppError::Conflict(_) => "conflict",
            AppError::PrintFailed(_) => "print_failed",
            AppError::PrintTimeout(_) => "print_timeout",
            AppError::Storage(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidTransition(msg)
            | AppError::Conflict(msg) => msg.clone(),

            AppError::PrintFailed(_) | AppError::PrintTimeout(_) => self.to_string(),

            // 记录内部错误但不暴露详细信息
            AppError::Storage(msg) => {
                error!(target: "storage", error = %msg, "Storage error occurred");
                "Storage error".to_string()
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                "Internal server error".to_string()
            }
        };

        let body = Json(ErrorBody {
            error: message,
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid JSON body: {}", e.body_text()))
    }
}
