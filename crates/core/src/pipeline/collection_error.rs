use thiserror::Error;

use crate::perception::domain::landmark_provider::ProviderError;
use crate::session::domain::session_error::SessionError;

/// Failures that end a collection without a report.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("could not start capture: {0}")]
    Capture(#[from] ProviderError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("collection worker panicked")]
    WorkerPanicked,
    #[error("collection already ran")]
    AlreadyRan,
}
