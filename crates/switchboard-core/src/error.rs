//! Unified error types for the Switchboard core.
//!
//! This module provides the error taxonomy shared by every layer: platform API
//! failures, option resolution failures, interaction protocol misuse and the
//! custom id codec. Setup-time errors of the registry and router live in
//! `switchboard-framework`.

use thiserror::Error;

// =============================================================================
// API Errors
// =============================================================================

/// Errors reported by the external platform collaborators.
///
/// Switchboard never retries a failed call; these are handed straight back to
/// the handler that issued it.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The transport is not connected to the platform.
    #[error("not connected to the platform")]
    NotConnected,

    /// The platform rejected the request.
    #[error("platform error ({status}): {message}")]
    Platform {
        /// HTTP-like status code returned by the platform.
        status: u16,
        /// Error message returned by the platform.
        message: String,
    },

    /// The referenced interaction token expired or was already consumed.
    #[error("unknown interaction")]
    UnknownInteraction,

    /// Failed to serialize/deserialize a payload.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// Option Resolution Errors
// =============================================================================

/// Errors raised while turning raw command options into typed arguments.
///
/// A command whose arguments fail to resolve is never invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The referenced entity is not present in the interaction's side tables.
    #[error("{0} reference not found in interaction data")]
    ReferenceNotFound(&'static str),

    /// A required option is missing from the envelope.
    #[error("required option '{0}' is missing")]
    MissingRequired(String),

    /// The raw value does not have the JSON shape its kind demands.
    #[error("option '{name}' expected a {expected} value")]
    InvalidValue {
        /// Option name.
        name: String,
        /// Expected value kind.
        expected: &'static str,
    },
}

// =============================================================================
// Interaction Protocol Errors
// =============================================================================

/// Raised when a handler drives an interaction through an illegal transition.
///
/// This is a programming error: it is raised before any network call and must
/// not be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("protocol violation in {operation}: {reason}")]
pub struct ProtocolViolation {
    /// The offending operation.
    pub operation: &'static str,
    /// Why the transition is illegal.
    pub reason: &'static str,
}

impl ProtocolViolation {
    /// The initial callback was already sent for this interaction.
    pub fn callback_already_sent(operation: &'static str) -> Self {
        Self {
            operation,
            reason: "callback already sent",
        }
    }

    /// The operation needs an initial callback first.
    pub fn callback_not_sent(operation: &'static str) -> Self {
        Self {
            operation,
            reason: "initial callback not sent yet",
        }
    }
}

/// Error returned by the live interaction handle.
#[derive(Debug, Clone, Error)]
pub enum InteractionError {
    /// Illegal state transition, detected before any network call.
    #[error(transparent)]
    Protocol(#[from] ProtocolViolation),

    /// The platform call itself failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

// =============================================================================
// Custom Id Codec Errors
// =============================================================================

/// Errors raised when encoding a custom token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The encoded identifier does not fit in the component id budget.
    #[error("budget exceeded: encoded custom id is {len} characters, limit is {limit}")]
    BudgetExceeded {
        /// Character count of the encoded identifier.
        len: usize,
        /// Exclusive upper bound.
        limit: usize,
    },

    /// The handler name contains the field delimiter.
    #[error("custom id name '{0}' must not contain ':'")]
    ReservedDelimiter(String),

    /// The bound data could not be serialized.
    #[error("failed to serialize custom id data: {0}")]
    Serialize(String),
}

/// Errors raised when decoding a custom token.
///
/// Identifiers that were not produced by this codec (for example components
/// created by another application) decode to an error, which the router treats
/// as "not ours".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Missing or unknown version prefix.
    #[error("unsupported custom id version in '{0}'")]
    UnsupportedVersion(String),

    /// The payload is not valid JSON.
    #[error("invalid custom id payload: {0}")]
    InvalidPayload(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for platform API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for live interaction operations.
pub type InteractionResult<T> = Result<T, InteractionError>;
