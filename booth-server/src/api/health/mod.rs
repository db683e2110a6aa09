//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 存储与打印机检查 | 无 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "uptime_seconds": 42,
//!   "checks": {
//!     "storage": { "status": "ok", "latency_ms": 1, "message": "3 print requests" },
//!     "printer": { "status": "ok", "latency_ms": 0, "message": "simulated" }
//!   }
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::{Instant, SystemTime};

use crate::core::ServerState;

/// 健康检查路由 - 公共路由
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    /// 运行时间 (秒)
    uptime_seconds: u64,
    checks: HealthChecks,
}

/// 健康检查详情
#[derive(Serialize)]
pub struct HealthChecks {
    /// 存储文件可读且格式正确
    storage: CheckResult,
    /// 打印机在线
    printer: CheckResult,
}

/// 单项检查结果
#[derive(Serialize)]
pub struct CheckResult {
    /// 状态 (ok | error)
    status: &'static str,
    /// 延迟 (毫秒)
    latency_ms: Option<u64>,
    message: Option<String>,
}

impl CheckResult {
    fn ok_with_latency(latency_ms: u64, message: impl Into<String>) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: Some(message.into()),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

// 服务器启动时间 (懒加载静态变量)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

/// 记录启动时间，服务启动时调用
pub fn mark_started() {
    START_TIME.get_or_init(SystemTime::now);
}

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// GET /health
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let storage_start = Instant::now();
    let storage = match state.storage.read_all().await {
        Ok(requests) => CheckResult::ok_with_latency(
            storage_start.elapsed().as_millis() as u64,
            format!("{} print requests", requests.len()),
        ),
        Err(e) => CheckResult::error(e.to_string()),
    };

    let printer_start = Instant::now();
    let printer = if state.printer.is_online().await {
        CheckResult::ok_with_latency(
            printer_start.elapsed().as_millis() as u64,
            state.printer.kind(),
        )
    } else {
        CheckResult::error(format!("{} printer offline", state.printer.kind()))
    };

    let all_ok = storage.is_ok() && printer.is_ok();

    Json(HealthResponse {
        status: if all_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: get_uptime_seconds(),
        checks: HealthChecks { storage, printer },
    })
}
