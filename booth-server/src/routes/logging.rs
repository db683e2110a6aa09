//! 请求日志中间件
//!
//! 每个请求一个 `http_request` span (请求 ID、方法、路径)，
//! 在 span 内记录开始和结束两条事件

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, info, info_span};

/// 请求日志中间件
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let (request_id, user_agent) = {
        let header = |name: &str, fallback: &'static str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(fallback)
                .to_string()
        };
        (header("x-request-id", "-"), header("user-agent", "unknown"))
    };

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = info_span!(
        "http_request",
        request_id = %request_id,
        method = %req.method(),
        path = %path,
    );

    async move {
        info!(user_agent = %user_agent, "Request started");

        let response = next.run(req).await;

        let status = response.status();
        info!(
            status = status.as_u16(),
            outcome = outcome(status),
            latency_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "server_error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "ok"
    }
}
