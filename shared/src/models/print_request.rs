//! Print Request Model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a print request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrintStatus {
    /// 已提交，等待审核
    #[default]
    Pending,
    /// 已审核，尚未打印
    Approved,
    /// 已打印 (终态)
    Printed,
}

impl PrintStatus {
    pub const ALL: [PrintStatus; 3] = [Self::Pending, Self::Approved, Self::Printed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Printed => "printed",
        }
    }

    /// Legal next states from `self`
    ///
    /// | From | To |
    /// |------|----|
    /// | pending | pending, approved, printed |
    /// | approved | approved, pending, printed |
    /// | printed | printed |
    pub fn allowed_transitions(&self) -> &'static [PrintStatus] {
        match self {
            Self::Pending => &[Self::Pending, Self::Approved, Self::Printed],
            Self::Approved => &[Self::Approved, Self::Pending, Self::Printed],
            Self::Printed => &[Self::Printed],
        }
    }

    pub fn can_transition_to(&self, next: PrintStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Printed)
    }
}

impl fmt::Display for PrintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown print status '{0}' (expected pending, approved or printed)")]
pub struct ParseStatusError(pub String);

impl FromStr for PrintStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "printed" => Ok(Self::Printed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Print request entity (persisted)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    pub id: String,
    /// Encoded image payload, usually a `data:image/...;base64,` URL
    pub image_data: String,
    pub status: PrintStatus,
}

impl PrintRequest {
    /// New pending request with a fresh id
    pub fn new(image_data: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            image_data: image_data.into(),
            status: PrintStatus::Pending,
        }
    }

    /// Merge the present fields of `patch` into this record
    ///
    /// `id` and `image_data` are immutable, so only the status is patchable.
    pub fn apply(&mut self, patch: &PrintRequestPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Partial update for [`PrintRequest`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintRequestPatch {
    pub status: Option<PrintStatus>,
}

impl PrintRequestPatch {
    pub fn status(status: PrintStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

/// Create print request payload
///
/// Extra client fields are accepted and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequestCreate {
    pub image_data: Option<String>,
}

/// Approve-and-print payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApprovePrintRequest {
    pub id: Option<String>,
}

/// Status update payload (`PUT /api/print-request/{id}`)
///
/// Kept as a raw string so an unknown value surfaces as a validation error
/// with a readable message rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_is_pending_with_unique_id() {
        let a = PrintRequest::new("abc");
        let b = PrintRequest::new("abc");
        assert_eq!(a.status, PrintStatus::Pending);
        assert_eq!(a.image_data, "abc");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let req = PrintRequest {
            id: "X".to_string(),
            image_data: "abc".to_string(),
            status: PrintStatus::Pending,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "X", "imageData": "abc", "status": "pending"})
        );
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in PrintStatus::ALL {
            assert_eq!(status.as_str().parse::<PrintStatus>().unwrap(), status);
            assert_eq!(status.to_string(), status.as_str());
        }
        assert_eq!(
            "shredded".parse::<PrintStatus>(),
            Err(ParseStatusError("shredded".to_string()))
        );
    }

    #[test]
    fn test_transition_table() {
        use PrintStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Printed));
        assert!(Approved.can_transition_to(Pending));
        assert!(Approved.can_transition_to(Printed));
        // re-asserting the current state is always allowed
        for status in PrintStatus::ALL {
            assert!(status.can_transition_to(status));
        }
        assert!(!Printed.can_transition_to(Pending));
        assert!(!Printed.can_transition_to(Approved));
        assert!(Printed.is_terminal());
    }

    #[test]
    fn test_apply_patch_only_touches_present_fields() {
        let mut req = PrintRequest::new("abc");
        let id = req.id.clone();

        req.apply(&PrintRequestPatch::default());
        assert_eq!(req.status, PrintStatus::Pending);

        req.apply(&PrintRequestPatch::status(PrintStatus::Printed));
        assert_eq!(req.status, PrintStatus::Printed);
        assert_eq!(req.id, id);
        assert_eq!(req.image_data, "abc");
    }

    #[test]
    fn test_create_payload_ignores_extra_fields() {
        let payload: PrintRequestCreate =
            serde_json::from_str(r#"{"imageData": "abc", "status": "printed", "copies": 3}"#)
                .unwrap();
        assert_eq!(payload.image_data.as_deref(), Some("abc"));
    }
}
