use thiserror::Error;

use crate::Access;

/// Misuse of the blackboard. These are configuration errors of the tree, not domain outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackboardError {
    #[error("client `{client}` has no {access} access to key `{key}`")]
    AccessDenied {
        client: String,
        key: &'static str,
        access: Access,
    },

    #[error("key `{0}` is not set")]
    KeyNotSet(&'static str),

    #[error("key `{0}` holds a different type than requested")]
    TypeMismatch(&'static str),

    #[error("client `{client}` cannot register key `{key}` after the blackboard was sealed")]
    RegistrationClosed { client: String, key: &'static str },
}

/// Failure reported by the vehicle link when a setpoint cannot be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VehicleError {
    #[error("vehicle link unavailable: {0}")]
    Link(String),

    #[error("setpoint rejected: {0}")]
    Rejected(String),
}
