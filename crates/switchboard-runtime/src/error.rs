//! Runtime error types.

use switchboard_core::ApiError;
use switchboard_framework::DuplicateCommandError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while building or starting the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The builder was finished without an [`InteractionApi`](switchboard_core::InteractionApi).
    #[error("No interaction API configured")]
    MissingApi,

    /// Two routers registered the same command.
    #[error("Command registered by more than one router: {0}")]
    DuplicateCommand(#[from] DuplicateCommandError),

    /// Bulk command registration was rejected.
    #[error("Command registration failed: {0}")]
    Registration(#[from] ApiError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
