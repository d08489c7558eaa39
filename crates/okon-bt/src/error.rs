use okon_core::BlackboardError;
use thiserror::Error;

/// Errors that abort a tick. Domain outcomes are statuses, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BtError {
    #[error(transparent)]
    Blackboard(#[from] BlackboardError),

    #[error("tree must be set up before the first tick")]
    NotSetUp,

    #[error("tree was already set up")]
    AlreadySetUp,
}
