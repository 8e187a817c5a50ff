//! Remote data services the components depend on.
//!
//! DESIGN
//! ======
//! Query execution, persistence, and update semantics live in the hosting
//! platform. The components only see these async traits, which keeps the
//! HTTP adapter swappable and lets tests substitute in-memory mocks.
//!
//! ERROR HANDLING
//! ==============
//! A rejected call carries the platform's error body, which is either a
//! list of `{message}` entries or a single `{message}` object. Components
//! turn that into one display string with `error_display_message`.

pub mod http;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::model::{BoatRecord, BoatType, RecordInput};


/// Fallback shown when a failure carries no usable message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

// =============================================================================
// ERRORS
// =============================================================================

/// One entry of a list-shaped error body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(default)]
    pub message: String,
}

/// Error payload attached to a rejected service call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    List(Vec<ErrorEntry>),
    Single {
        #[serde(default)]
        message: Option<String>,
    },
}

impl ErrorBody {
    /// Collapse the body into one user-facing string.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::List(entries) => entries
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Self::Single { message: Some(message) } => message.clone(),
            Self::Single { message: None } => UNKNOWN_ERROR.to_owned(),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    /// The service answered and refused the request.
    #[error("service rejected request (status {status}): {}", .body.display_message())]
    Rejected { status: u16, body: ErrorBody },
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The response could not be decoded.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Rejection with a single-message body.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected { status, body: ErrorBody::Single { message: Some(message.into()) } }
    }
}

impl ErrorCode for ServiceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "E_SERVICE_REJECTED",
            Self::Transport(_) => "E_SERVICE_TRANSPORT",
            Self::Decode(_) => "E_SERVICE_DECODE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Display string for a failed query: joined list messages, the single
/// message, or `"Unknown error"`.
#[must_use]
pub fn error_display_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Rejected { body, .. } => body.display_message(),
        ServiceError::Transport(_) | ServiceError::Decode(_) => UNKNOWN_ERROR.to_owned(),
    }
}

// =============================================================================
// SERVICE TRAITS
// =============================================================================

/// Lists the valid boat categories.
#[async_trait::async_trait]
pub trait BoatTypeService: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the lookup fails.
    async fn get_boat_types(&self) -> Result<Vec<BoatType>, ServiceError>;
}

/// Lists boats, optionally narrowed to one category.
#[async_trait::async_trait]
pub trait BoatQueryService: Send + Sync {
    /// An empty `boat_type_id` means no filter.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the query fails.
    async fn get_boats(&self, boat_type_id: &str) -> Result<Vec<BoatRecord>, ServiceError>;
}

/// Persists field edits for a single record.
#[async_trait::async_trait]
pub trait BoatUpdateService: Send + Sync {
    /// Each call is its own transaction.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the update is rejected or not delivered.
    async fn update_record(&self, input: RecordInput) -> Result<(), ServiceError>;
}
