//! Print request service
//!
//! Business rules of the queue: create, list, approve-and-print and the
//! checked status update. Handlers stay thin and call into this.

use std::sync::Arc;
use std::time::Duration;

use booth_printer::{PrintError, Printer};
use dashmap::DashSet;
use shared::models::{PrintRequest, PrintRequestPatch, PrintStatus};
use tracing::{error, info, instrument, warn};

use super::storage::PrintRequestStorage;
use crate::utils::validation::{MAX_ID_LEN, require_text, validate_required_text};
use crate::utils::{AppError, AppResult};

const DEFAULT_PRINT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_IMAGE_DATA_LEN: usize = 16_000_000;

/// Ids with an approve-and-print currently running
#[derive(Debug, Clone, Default)]
struct InFlight(Arc<DashSet<String>>);

impl InFlight {
    fn try_acquire(&self, id: &str) -> Option<InFlightGuard> {
        self.0.insert(id.to_string()).then(|| InFlightGuard {
            set: self.0.clone(),
            id: id.to_string(),
        })
    }
}

/// Releases the id when the approval finishes, fails or is cancelled
struct InFlightGuard {
    set: Arc<DashSet<String>>,
    id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

/// Print request service
#[derive(Clone)]
pub struct PrintRequestService {
    storage: PrintRequestStorage,
    printer: Arc<dyn Printer>,
    print_timeout: Duration,
    max_image_data_len: usize,
    in_flight: InFlight,
}

impl PrintRequestService {
    pub fn new(storage: PrintRequestStorage, printer: Arc<dyn Printer>) -> Self {
        Self {
            storage,
            printer,
            print_timeout: DEFAULT_PRINT_TIMEOUT,
            max_image_data_len: DEFAULT_MAX_IMAGE_DATA_LEN,
            in_flight: InFlight::default(),
        }
    }

    /// Upper bound on a single printer call
    pub fn with_print_timeout(mut self, timeout: Duration) -> Self {
        self.print_timeout = timeout;
        self
    }

    pub fn with_max_image_data_len(mut self, len: usize) -> Self {
        self.max_image_data_len = len;
        self
    }

    /// Store a new pending request
    pub async fn create(&self, image_data: Option<String>) -> AppResult<PrintRequest> {
        let image_data = require_text(image_data, "imageData", self.max_image_data_len)?;

        let request = PrintRequest::new(image_data);
        self.storage.append(request.clone()).await?;

        info!(id = %request.id, bytes = request.image_data.len(), "Print request received");
        Ok(request)
    }

    /// All requests in storage order
    pub async fn list(&self) -> AppResult<Vec<PrintRequest>> {
        Ok(self.storage.read_all().await?)
    }

    /// Print the request's image and mark it printed
    ///
    /// On printer failure or timeout the stored status is left unchanged so
    /// the client can retry.
    #[instrument(skip(self))]
    pub async fn approve_and_print(&self, id: &str) -> AppResult<PrintRequest> {
        validate_required_text(id, "id", MAX_ID_LEN)?;

        let _guard = self.in_flight.try_acquire(id).ok_or_else(|| {
            AppError::conflict(format!("Print request {} is already being printed", id))
        })?;

        let request = self
            .storage
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if request.status.is_terminal() {
            return Err(AppError::InvalidTransition(format!(
                "Print request {} has already been printed",
                id
            )));
        }

        match tokio::time::timeout(self.print_timeout, self.printer.print(&request.image_data))
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(PrintError::Timeout(msg))) => {
                warn!(printer = self.printer.kind(), error = %msg, "Printer reported timeout");
                return Err(AppError::PrintTimeout(msg));
            }
            Ok(Err(e)) => {
                error!(printer = self.printer.kind(), error = %e, "Printing error");
                return Err(AppError::PrintFailed(e.to_string()));
            }
            Err(_) => {
                let timeout_ms = self.print_timeout.as_millis() as u64;
                warn!(printer = self.printer.kind(), timeout_ms, "Printer call timed out");
                return Err(AppError::PrintTimeout(format!(
                    "no response within {timeout_ms} ms"
                )));
            }
        }

        let updated = self
            .storage
            .update_by_id(id, &PrintRequestPatch::status(PrintStatus::Printed))
            .await?
            .ok_or_else(|| not_found(id))?;

        info!("Print request approved and printed");
        Ok(updated)
    }

    /// Set a request's status without printing
    ///
    /// `status` must name a known state and be a legal transition from the
    /// current one.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: Option<String>) -> AppResult<PrintRequest> {
        let raw = status.ok_or_else(|| AppError::validation("status is required"))?;
        let next: PrintStatus = raw
            .parse()
            .map_err(|e: shared::ParseStatusError| AppError::validation(e.to_string()))?;

        let updated = self
            .storage
            .transition(id, |current| {
                if current.status.can_transition_to(next) {
                    Ok(PrintRequestPatch::status(next))
                } else {
                    Err(AppError::InvalidTransition(format!(
                        "Cannot move print request {} from {} to {}",
                        id, current.status, next
                    )))
                }
            })
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(status = %updated.status, "Print request status updated");
        Ok(updated)
    }
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(format!("Print request not found: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use booth_printer::SimulatedPrinter;

    fn service(dir: &tempfile::TempDir, printer: SimulatedPrinter) -> PrintRequestService {
        let storage = PrintRequestStorage::new(dir.path().join("print_requests.json"));
        PrintRequestService::new(storage, Arc::new(printer))
    }

    fn instant_printer() -> SimulatedPrinter {
        SimulatedPrinter::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, instant_printer());

        let created = svc.create(Some("abc".into())).await.unwrap();
        let all = svc.list().await.unwrap();
        assert_eq!(all, vec![created.clone()]);
        assert_eq!(created.status, PrintStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_requires_image_data() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, instant_printer());

        assert!(matches!(svc.create(None).await, Err(AppError::Validation(_))));
        assert!(matches!(
            svc.create(Some("  ".into())).await,
            Err(AppError::Validation(_))
        ));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_oversized_image() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, instant_printer()).with_max_image_data_len(4);
        assert!(matches!(
            svc.create(Some("abcde".into())).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_approve_marks_printed() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, instant_printer());
        let a = svc.create(Some("a".into())).await.unwrap();
        let b = svc.create(Some("b".into())).await.unwrap();

        let printed = svc.approve_and_print(&a.id).await.unwrap();
        assert_eq!(printed.status, PrintStatus::Printed);

        let all = svc.list().await.unwrap();
        assert_eq!(all[0].status, PrintStatus::Printed);
        assert_eq!(all[1], b);
    }

    #[tokio::test]
    async fn test_approve_twice_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, instant_printer());
        let a = svc.create(Some("a".into())).await.unwrap();

        svc.approve_and_print(&a.id).await.unwrap();
        assert!(matches!(
            svc.approve_and_print(&a.id).await,
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_approve_failure_leaves_pending() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, instant_printer().fail_with("paper out"));
        let a = svc.create(Some("a".into())).await.unwrap();

        let err = svc.approve_and_print(&a.id).await.unwrap_err();
        assert!(matches!(err, AppError::PrintFailed(ref msg) if msg.contains("paper out")));
        assert_eq!(svc.list().await.unwrap()[0].status, PrintStatus::Pending);

        // the in-flight guard was released, so a retry reaches the printer again
        assert!(matches!(
            svc.approve_and_print(&a.id).await,
            Err(AppError::PrintFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_approve_timeout_leaves_pending() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, SimulatedPrinter::new(Duration::from_secs(5)))
            .with_print_timeout(Duration::from_millis(20));
        let a = svc.create(Some("a".into())).await.unwrap();

        let err = svc.approve_and_print(&a.id).await.unwrap_err();
        assert!(matches!(err, AppError::PrintTimeout(ref msg) if msg.contains("20 ms")));
        assert_eq!(svc.list().await.unwrap()[0].status, PrintStatus::Pending);
    }

    /// Printer whose own connect timer fires before the service deadline
    struct UnreachablePrinter;

    #[async_trait::async_trait]
    impl Printer for UnreachablePrinter {
        async fn print(&self, _image_data: &str) -> booth_printer::PrintResult<()> {
            Err(PrintError::Timeout("Connection timeout: 10.0.0.9:9100".into()))
        }

        async fn is_online(&self) -> bool {
            false
        }

        fn kind(&self) -> &'static str {
            "unreachable"
        }
    }

    #[tokio::test]
    async fn test_printer_timeout_maps_to_print_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PrintRequestStorage::new(dir.path().join("print_requests.json"));
        let svc = PrintRequestService::new(storage, Arc::new(UnreachablePrinter));
        let a = svc.create(Some("a".into())).await.unwrap();

        let err = svc.approve_and_print(&a.id).await.unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::GATEWAY_TIMEOUT);
        assert!(matches!(err, AppError::PrintTimeout(ref msg) if msg.contains("10.0.0.9")));
        assert_eq!(svc.list().await.unwrap()[0].status, PrintStatus::Pending);
    }

    #[tokio::test]
    async fn test_concurrent_approvals_print_once() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, SimulatedPrinter::new(Duration::from_millis(100)));
        let a = svc.create(Some("a".into())).await.unwrap();

        let (first, second) = tokio::join!(svc.approve_and_print(&a.id), svc.approve_and_print(&a.id));
        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(AppError::Conflict(_))))
        );
    }

    #[tokio::test]
    async fn test_update_status_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, instant_printer());
        let a = svc.create(Some("a".into())).await.unwrap();

        let approved = svc.update_status(&a.id, Some("approved".into())).await.unwrap();
        assert_eq!(approved.status, PrintStatus::Approved);

        // approved requests can still be printed
        let printed = svc.approve_and_print(&a.id).await.unwrap();
        assert_eq!(printed.status, PrintStatus::Printed);

        assert!(matches!(
            svc.update_status(&a.id, Some("pending".into())).await,
            Err(AppError::InvalidTransition(_))
        ));
        assert_eq!(svc.list().await.unwrap()[0].status, PrintStatus::Printed);
    }

    #[tokio::test]
    async fn test_update_status_validation() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir, instant_printer());
        let a = svc.create(Some("a".into())).await.unwrap();

        assert!(matches!(
            svc.update_status(&a.id, None).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            svc.update_status(&a.id, Some("shredded".into())).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            svc.update_status("ghost", Some("printed".into())).await,
            Err(AppError::NotFound(_))
        ));
    }
}
