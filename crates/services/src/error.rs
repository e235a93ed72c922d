//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;

/// Errors emitted by the attempt workflow.
///
/// Submitting an already-submitted attempt is not an error: the workflow
/// reports it as a quiet no-op outcome, so only API failures surface here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error(transparent)]
    Api(#[from] ApiError),
}
