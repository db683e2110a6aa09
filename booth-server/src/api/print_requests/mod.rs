//! Print Request API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/print-request | POST | 提交打印请求 |
//! | /api/print-request | GET | 列出全部请求 |
//! | /api/print-request | PUT | 审核并打印 (`{ id }`) |
//! | /api/print-request/{id} | PUT | 更新状态 (`{ status }`) |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/print-request", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::list)
                .post(handler::create)
                .put(handler::approve),
        )
        .route("/{id}", put(handler::update_status))
}
