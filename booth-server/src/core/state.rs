use std::sync::Arc;

use anyhow::Context;
use booth_printer::{NetworkPrinter, Printer, SimulatedPrinter};

use crate::core::{Config, PrinterKind, Result};
use crate::printing::{PrintRequestService, PrintRequestStorage};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求处理器拿到的是同一组服务。
/// 打印请求数据本身不在这里缓存，始终以存储文件为准。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | storage | PrintRequestStorage | JSON 文件存储 |
/// | printer | Arc<dyn Printer> | 打印机适配器 |
/// | print_requests | PrintRequestService | 打印请求业务逻辑 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub storage: PrintRequestStorage,
    pub printer: Arc<dyn Printer>,
    pub print_requests: PrintRequestService,
}

impl ServerState {
    /// 创建服务器状态 (手动构造，测试中注入打印机)
    pub fn new(config: Config, storage: PrintRequestStorage, printer: Arc<dyn Printer>) -> Self {
        let print_requests = PrintRequestService::new(storage.clone(), printer.clone())
            .with_print_timeout(config.print_timeout())
            .with_max_image_data_len(config.max_image_data_len);

        Self {
            config,
            storage,
            printer,
            print_requests,
        }
    }

    /// 按配置初始化服务器状态
    ///
    /// 1. 存储 (DATA_FILE)
    /// 2. 打印机 (PRINTER_KIND)
    pub async fn initialize(config: &Config) -> Result<Self> {
        let storage = PrintRequestStorage::new(&config.data_file);

        // 启动时读一次，尽早暴露损坏的存储文件
        let existing = storage
            .read_all()
            .await
            .context("failed to load print request storage")?;
        tracing::info!(
            path = %storage.path().display(),
            count = existing.len(),
            "Print request storage ready"
        );

        let printer: Arc<dyn Printer> = match config.printer_kind {
            PrinterKind::Simulated => Arc::new(SimulatedPrinter::new(config.printer_delay())),
            PrinterKind::Network => Arc::new(
                NetworkPrinter::from_addr(&config.printer_addr)?
                    .with_timeout(config.printer_connect_timeout()),
            ),
        };
        tracing::info!(kind = printer.kind(), "Printer configured");

        Ok(Self::new(config.clone(), storage, printer))
    }
}
