//! Print Request API Handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use shared::models::{ApprovePrintRequest, PrintRequest, PrintRequestCreate, StatusUpdate};
use shared::response::{MessageResponse, PrintRequestCreated};

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/print-request - 获取所有打印请求
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<PrintRequest>>> {
    let requests = state.print_requests.list().await?;
    Ok(Json(requests))
}

/// POST /api/print-request - 提交打印请求
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<PrintRequestCreate>, JsonRejection>,
) -> AppResult<Json<PrintRequestCreated>> {
    let Json(payload) = payload?;
    let request = state.print_requests.create(payload.image_data).await?;

    Ok(Json(PrintRequestCreated {
        id: request.id,
        message: "Print request received".to_string(),
    }))
}

/// PUT /api/print-request - 审核并打印
pub async fn approve(
    State(state): State<ServerState>,
    payload: Result<Json<ApprovePrintRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    let id = payload.id.unwrap_or_default();
    state.print_requests.approve_and_print(&id).await?;

    Ok(Json(MessageResponse::new("Print request approved and printed")))
}

/// PUT /api/print-request/{id} - 更新状态 (不触发打印)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> AppResult<Json<PrintRequest>> {
    let Json(payload) = payload?;
    let request = state.print_requests.update_status(&id, payload.status).await?;
    Ok(Json(request))
}
