//! Vault client error types.

use std::fmt;

use thiserror::Error;
use vizivault_model::ModelError;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// The phase of a save that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStage {
    /// Removing one cleared attribute key.
    DeleteAttribute(String),
    /// Upserting the entity's id and tags.
    UpsertMetadata,
    /// Uploading the batch of added attributes.
    UpsertAttributes,
}

impl fmt::Display for SaveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStage::DeleteAttribute(key) => write!(f, "delete of attribute '{key}'"),
            SaveStage::UpsertMetadata => f.write_str("metadata upsert"),
            SaveStage::UpsertAttributes => f.write_str("attribute upsert"),
        }
    }
}

/// Errors that can occur when talking to the vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Local validation or lookup failure; raised before any I/O.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The vault answered with a non-success status.
    #[error("vault error {status}: {message}")]
    Response { status: u16, message: String },

    /// No response was obtained (connect, TLS, timeout, body read).
    #[error("vault communication failed: {0}")]
    Communication(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A save stopped partway. Everything before `stage` was committed both
    /// remotely and locally; `stage` and everything after it is still pending.
    #[error("save of '{entity_id}' failed during {stage}: {source}")]
    SaveFailed {
        entity_id: String,
        stage: SaveStage,
        #[source]
        source: Box<VaultError>,
    },
}

impl VaultError {
    /// HTTP status of the underlying vault response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            VaultError::Response { status, .. } => Some(*status),
            VaultError::Communication(e) => e.status().map(|s| s.as_u16()),
            VaultError::SaveFailed { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Returns true for a vault 404 or a local not-found.
    pub fn is_not_found(&self) -> bool {
        match self {
            VaultError::Model(ModelError::NotFound(_)) => true,
            VaultError::SaveFailed { source, .. } => source.is_not_found(),
            other => other.status() == Some(404),
        }
    }

    /// The save phase that failed, for [`VaultError::SaveFailed`].
    pub fn save_stage(&self) -> Option<&SaveStage> {
        match self {
            VaultError::SaveFailed { stage, .. } => Some(stage),
            _ => None,
        }
    }

    pub(crate) fn during_save(self, entity_id: &str, stage: SaveStage) -> Self {
        VaultError::SaveFailed {
            entity_id: entity_id.to_string(),
            stage,
            source: Box::new(self),
        }
    }
}
