//! Error types for folio_core

use crate::viewport::ElementId;
use thiserror::Error;

/// Errors raised by the runtime primitives
///
/// None of these reach the page user. Components that receive one degrade
/// instead (a reveal that cannot observe shows its content immediately).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FolioError {
    /// The runtime offers no intersection observation
    #[error("intersection observation unavailable: {0}")]
    ObserverUnavailable(String),

    /// The element was never mounted or has been unmounted
    #[error("unknown element {0:?}")]
    UnknownElement(ElementId),
}

/// Result type for folio_core operations
pub type Result<T> = std::result::Result<T, FolioError>;
