//! Typed errors for action construction, registration, and tag coercion.

use thiserror::Error;

/// Errors raised while building actions, registering creators and handlers,
/// or coercing a creator to its type tag.
///
/// Registration and coercion failures are programmer-usage errors raised
/// synchronously at setup time; they are meant to fail fast, not to be
/// caught and retried. Async operation failures never surface here; they
/// are converted into rejected/failure actions instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Action built with an empty type tag
    #[error("empty action type is not allowed")]
    EmptyType,

    /// Type tag registered twice on one action-creator factory
    #[error("cannot create action creator with duplicate type \"{0}\"")]
    DuplicateType(String),

    /// Handler registered twice for one tag on one reducer chain
    #[error("cannot handle type \"{0}\" more than once")]
    DuplicateHandler(String),

    /// Attempt to coerce an async action creator group to a string
    #[error(
        "forbidden to stringify an async action creator; use the subordinate action creators instead"
    )]
    AsyncStringify,

    /// Payload, meta, or error value could not be serialized
    #[error("failed to serialize action field: {0}")]
    FieldSerialize(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
