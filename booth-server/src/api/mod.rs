//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`print_requests`] - 打印请求队列接口

pub mod health;
pub mod print_requests;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
