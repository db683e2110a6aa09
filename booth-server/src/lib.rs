//! Booth Print Server - 打印请求队列服务
//!
//! # 架构概述
//!
//! 客户端提交图片打印请求，服务端持久化到 JSON 文件；审核接口调用打印机，
//! 成功后将请求标记为已打印。
//!
//! # 模块结构
//!
//! ```text
//! booth-server/src/
//! ├── core/          # 配置、状态、服务器、启动错误
//! ├── printing/      # 存储 (JSON 文件) + 打印请求业务逻辑
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装、中间件
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod core;
pub mod printing;
pub mod routes;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, PrinterKind, Server, ServerError, ServerState};
pub use printing::{PrintRequestService, PrintRequestStorage, StorageError};
pub use routes::build_app;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env、读取配置并初始化日志
pub fn setup_environment() -> crate::core::Result<Config> {
    let dotenv_path = match dotenv::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => return Err(ServerError::Config(format!("failed to load .env: {e}"))),
    };

    let config = Config::from_env()?;
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    if let Some(path) = dotenv_path {
        tracing::info!(path = %path.display(), "Loaded .env");
    }
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____              __  __
   / __ )____  ____  / /_/ /_
  / __  / __ \/ __ \/ __/ __ \
 / /_/ / /_/ / /_/ / /_/ / / /
/_____/\____/\____/\__/_/ /_/
      print queue
    "#
    );
}
