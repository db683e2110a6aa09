use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use super::error::{Result, ServerError};

const MAX_PRINTER_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// 打印机后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrinterKind {
    /// 模拟打印 (固定延迟)
    #[default]
    Simulated,
    /// 网络打印机 (TCP 9100)
    Network,
}

impl FromStr for PrinterKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "network" => Ok(Self::Network),
            other => Err(format!("unknown printer kind: {other}")),
        }
    }
}

/// 服务器配置 - 打印队列服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_HOST | 0.0.0.0 | 监听地址 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATA_FILE | print_requests.json | 打印请求存储文件 (相对于工作目录) |
/// | PRINTER_KIND | simulated | simulated / network |
/// | PRINTER_ADDR | 127.0.0.1:9100 | 网络打印机地址 |
/// | PRINTER_DELAY_MS | 2000 | 模拟打印耗时(毫秒) |
/// | PRINT_TIMEOUT_MS | 30000 | 单次打印超时(毫秒) |
/// | MAX_BODY_BYTES | 16777216 | 请求体上限 |
/// | MAX_IMAGE_DATA_LEN | 16000000 | imageData 最大长度 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (设置后按天滚动写文件) |
/// | ENVIRONMENT | development | 运行环境 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 PRINTER_KIND=network PRINTER_ADDR=192.168.1.50:9100 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    /// 存储文件路径
    pub data_file: String,
    pub printer_kind: PrinterKind,
    pub printer_addr: String,
    /// 模拟打印耗时 (毫秒)
    pub printer_delay_ms: u64,
    /// 单次打印超时 (毫秒)
    pub print_timeout_ms: u64,
    pub max_body_bytes: usize,
    pub max_image_data_len: usize,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

/// 宽松读取: 未设置或无法解析时使用默认值
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 严格解析: 未设置 (或为空) 时使用默认值，设置了但无法解析则返回配置错误
fn parse_strict<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value.filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| ServerError::Config(format!("invalid {key}={raw:?}: {e}"))),
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 数值项无法解析时回退到默认值；PRINTER_KIND 写错则直接报错，
    /// 避免误用模拟打印机把请求标记为已打印。
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            http_host: std::env::var("HTTP_HOST").unwrap_or(defaults.http_host),
            http_port: env_or("HTTP_PORT", defaults.http_port),
            data_file: std::env::var("DATA_FILE").unwrap_or(defaults.data_file),
            printer_kind: parse_strict(
                "PRINTER_KIND",
                std::env::var("PRINTER_KIND").ok(),
                defaults.printer_kind,
            )?,
            printer_addr: std::env::var("PRINTER_ADDR").unwrap_or(defaults.printer_addr),
            printer_delay_ms: env_or("PRINTER_DELAY_MS", defaults.printer_delay_ms),
            print_timeout_ms: env_or("PRINT_TIMEOUT_MS", defaults.print_timeout_ms),
            max_body_bytes: env_or("MAX_BODY_BYTES", defaults.max_body_bytes),
            max_image_data_len: env_or("MAX_IMAGE_DATA_LEN", defaults.max_image_data_len),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            shutdown_timeout_ms: env_or("SHUTDOWN_TIMEOUT_MS", defaults.shutdown_timeout_ms),
        })
    }

    /// 在默认配置上覆盖存储路径和端口 (不读环境变量)
    ///
    /// 常用于测试场景
    pub fn with_overrides(data_file: impl Into<String>, http_port: u16) -> Self {
        Self {
            data_file: data_file.into(),
            http_port,
            ..Self::default()
        }
    }

    pub fn print_timeout(&self) -> Duration {
        Duration::from_millis(self.print_timeout_ms)
    }

    /// 网络打印机连接超时: 最多 5 秒，且不超过整体打印超时的一半
    pub fn printer_connect_timeout(&self) -> Duration {
        MAX_PRINTER_CONNECT_TIMEOUT.min(self.print_timeout() / 2)
    }

    pub fn printer_delay(&self) -> Duration {
        Duration::from_millis(self.printer_delay_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".into(),
            http_port: 3000,
            data_file: "print_requests.json".into(),
            printer_kind: PrinterKind::default(),
            printer_addr: "127.0.0.1:9100".into(),
            printer_delay_ms: 2000,
            print_timeout_ms: 30_000,
            max_body_bytes: 16 * 1024 * 1024,
            max_image_data_len: 16_000_000,
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
            shutdown_timeout_ms: 10_000,
        }
    }
}
