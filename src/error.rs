//! Error types for rigcascade
//!
//! Library errors use `thiserror`. Each port carries its own error type
//! and converts into [`CascadeError`] with `?`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{DatabaseError, PipelineError, SceneError, SpawnError};
use crate::domain::value_objects::{LocatorError, RepublishStage, VersionId};

/// Result type alias for rigcascade operations
pub type CascadeResult<T> = Result<T, CascadeError>;

/// Main error type for rigcascade operations
#[derive(Error, Debug)]
pub enum CascadeError {
    /// Asset database failure (storage unavailable, malformed documents)
    #[error("asset database error: {0}")]
    Database(#[from] DatabaseError),

    /// Scene host failure
    #[error("scene host error: {0}")]
    Scene(#[from] SceneError),

    /// Publish pipeline failure
    #[error("publish pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Worker process could not be started
    #[error("process error: {0}")]
    Spawn(#[from] SpawnError),

    /// Source locator could not be resolved
    #[error("invalid source locator: {0}")]
    Locator(#[from] LocatorError),

    /// The named asset does not exist
    #[error("asset '{0}' not found")]
    AssetNotFound(String),

    /// The named subset does not exist under the asset
    #[error("subset '{subset}' not found under asset '{asset}'")]
    SubsetNotFound { asset: String, subset: String },

    /// The subset exists but nothing was ever published to it
    #[error("subset '{0}' has no published versions")]
    NoVersions(String),

    /// A version id handed to the worker no longer exists
    #[error("version {0} not found")]
    VersionNotFound(VersionId),

    /// An explicitly named version was published under another subset
    #[error("version {version} does not belong to subset '{subset}'")]
    VersionSubsetMismatch { version: VersionId, subset: String },

    /// A dependent version has no recorded source scene
    #[error("version {0} has no source scene recorded")]
    MissingSource(VersionId),

    /// The reopened scene holds no reference to the base subset
    #[error("no loaded reference to subset '{subset}' in {scene}; this job should never have been planned")]
    NoMatchingReference { subset: String, scene: PathBuf },

    /// The host panicked while the pipeline was running
    #[error("host failure during {stage}: {diagnostic}")]
    Host {
        stage: RepublishStage,
        diagnostic: String,
    },

    /// At least one job did not extract successfully
    #[error("atomicity not held, aborting: {reason}")]
    AtomicityNotHeld { reason: String },

    /// The worker payload could not be decoded
    #[error("invalid job descriptor: {0}")]
    InvalidDescriptor(String),

    /// A repair capability id is not registered
    #[error("unknown repair capability '{0}'")]
    UnknownCapability(String),

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
