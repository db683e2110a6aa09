//! Printer adapters
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)
//! - Simulated printer (fixed delay, optional forced failure)

use crate::error::{PrintError, PrintResult};
use crate::payload::decode_image_data;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Trait for printer adapters
///
/// Object safe so the server can hold any adapter as `Arc<dyn Printer>`.
/// Calls may be slow and may run concurrently with each other.
#[async_trait]
pub trait Printer: Send + Sync {
    /// Print one image payload (data URL or bare base64)
    async fn print(&self, image_data: &str) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;

    /// Short adapter name for logs and health output
    fn kind(&self) -> &'static str;
}

/// Network printer (TCP port 9100)
///
/// Sends the decoded image bytes as-is. Most label/photo printers with a raw
/// port accept PNG/JPEG directly.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        Self::from_addr(&format!("{}:{}", host, port))
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

#[async_trait]
impl Printer for NetworkPrinter {
    #[instrument(skip(self, image_data), fields(addr = %self.addr, data_len = image_data.len()))]
    async fn print(&self, image_data: &str) -> PrintResult<()> {
        let payload = decode_image_data(image_data)?;
        payload.ensure_image()?;

        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        info!(mime = ?payload.mime, "Connected, sending {} bytes", payload.bytes.len());

        stream.write_all(&payload.bytes).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;

        stream.flush().await?;
        stream.shutdown().await?;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => {
                info!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }

    fn kind(&self) -> &'static str {
        "network"
    }
}

/// Simulated printer
///
/// Waits `delay` and reports success, or the configured failure. Used on
/// kiosks without attached hardware and in tests.
#[derive(Debug, Clone)]
pub struct SimulatedPrinter {
    delay: Duration,
    failure: Option<String>,
}

impl SimulatedPrinter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
        }
    }

    /// Make every print fail with [`PrintError::Offline`]
    pub fn fail_with(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedPrinter {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl Printer for SimulatedPrinter {
    #[instrument(skip(self, image_data), fields(data_len = image_data.len(), delay_ms = self.delay.as_millis() as u64))]
    async fn print(&self, image_data: &str) -> PrintResult<()> {
        info!("Printing image...");
        tokio::time::sleep(self.delay).await;

        if let Some(reason) = &self.failure {
            warn!(reason = %reason, "Simulated print failed");
            return Err(PrintError::Offline(reason.clone()));
        }

        info!("Image printed successfully");
        Ok(())
    }

    async fn is_online(&self) -> bool {
        self.failure.is_none()
    }

    fn kind(&self) -> &'static str {
        "simulated"
    }
}
