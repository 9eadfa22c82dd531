//! Core error types for contactfeed-core.
//!
//! Every failure the sync engine can surface is a variant of [`CoreError`];
//! the credential, validation and configuration families get their own enums
//! so callers can match on them without string inspection.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for contactfeed-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Credential acquisition or use failed. Always fatal for the run.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A command parameter or entry failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The server rejected a write because the entry's ETag is stale.
    #[error("Conflict updating {url}: {message}")]
    Conflict { url: String, message: String },

    /// The entry or feed does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Placeholders for deleted entries are no longer available.
    #[error("Entries no longer available: {0}")]
    TransientUnavailable(String),

    /// Transport failure talking to the remote service.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Filesystem failure while persisting an attachment.
    #[error("Storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other non-success response from the remote service.
    #[error("Remote service returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// Response parsed as JSON but is not a well-formed entry or feed.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Credential errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The key file could not be read
    #[error("Failed to read key file {path}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key material is malformed
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    /// No service account identifier was configured or found in the key file
    #[error("Service account id not configured")]
    MissingServiceAccount,

    /// Signing the JWT assertion failed
    #[error("Failed to sign token assertion: {0}")]
    Signing(String),

    /// Token exchange failed
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// The remote service refused the token
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Access token expired
    #[error("Access token expired")]
    TokenExpired,
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Timestamp is not ISO-8601
    #[error("Invalid timestamp for '{field}': {value}")]
    InvalidTimestamp { field: String, value: String },

    /// Numeric bound below zero
    #[error("'{field}' must be non-negative, got {value}")]
    Negative { field: String, value: i64 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Required field missing for the selected action
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Both the contact and the group feed were selected
    #[error("Only one of contactfeed / groupfeed should be specified")]
    ConflictingFeedKinds,

    /// System group identifier outside the closed set
    #[error("Unrecognized system group id: {0}")]
    UnknownSystemGroup(String),

    /// Entry is a system group or carries no edit link
    #[error("Entry {0} is not editable")]
    NotEditable(String),

    /// Two extended properties share a name
    #[error("Duplicate extended property: {0}")]
    DuplicateExtendedProperty(String),

    /// Contact merged into group or the reverse
    #[error("Cannot merge a {patch} patch into a {canonical} entry")]
    KindMismatch {
        canonical: &'static str,
        patch: &'static str,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl CoreError {
    /// Whether no further action can succeed in this process after this
    /// failure. Everything else only fails the current action.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Auth(_) | CoreError::Config(_))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
