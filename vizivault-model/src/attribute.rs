use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::timestamp;

/// Server-assigned identifier of one persisted attribute value.
///
/// The vault is free to hand these out as strings or integers; whichever form
/// arrives is kept so it can be echoed back unchanged. Integers above
/// `i64::MAX` land in [`DataPointId::Unsigned`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPointId {
    Numeric(i64),
    Unsigned(u64),
    Text(String),
}

impl fmt::Display for DataPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataPointId::Numeric(id) => write!(f, "{id}"),
            DataPointId::Unsigned(id) => write!(f, "{id}"),
            DataPointId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for DataPointId {
    fn from(id: i64) -> Self {
        DataPointId::Numeric(id)
    }
}

impl From<u64> for DataPointId {
    fn from(id: u64) -> Self {
        i64::try_from(id).map_or(DataPointId::Unsigned(id), DataPointId::Numeric)
    }
}

impl From<&str> for DataPointId {
    fn from(id: &str) -> Self {
        DataPointId::Text(id.to_string())
    }
}

impl From<String> for DataPointId {
    fn from(id: String) -> Self {
        DataPointId::Text(id)
    }
}

/// One typed, timestamped piece of data tied to an entity and a named schema.
///
/// Attributes built on the client carry no [`DataPointId`] and no timestamps;
/// those are filled in by the vault and only show up on attributes
/// deserialized from server responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_point_id: Option<DataPointId>,
    /// Owning entity. Called `userId` on the wire for users and entities alike.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Attribute definition name this value belongs to.
    #[serde(rename = "attribute")]
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub regulations: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        rename = "createdDate",
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    created_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "modifiedDate",
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    modified_at: Option<DateTime<Utc>>,
}

impl Attribute {
    /// Creates a client-side attribute for `key` holding `value`.
    ///
    /// Fails with [`ModelError::InvalidArgument`] when `key` is empty.
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> ModelResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(ModelError::InvalidArgument(
                "attribute key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            data_point_id: None,
            entity_id: None,
            key,
            sensitivity: None,
            value: value.into(),
            regulations: Vec::new(),
            tags: Vec::new(),
            created_at: None,
            modified_at: None,
        })
    }

    #[must_use]
    pub fn with_sensitivity(mut self, sensitivity: impl Into<String>) -> Self {
        self.sensitivity = Some(sensitivity.into());
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_regulations<I, S>(mut self, regulations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regulations = regulations.into_iter().map(Into::into).collect();
        self
    }

    /// The attribute definition name. Never empty.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Creation time assigned by the vault, if this value came from the server.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Last modification time assigned by the vault.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    /// Returns true if the vault has already assigned this value an identity.
    pub fn is_persisted(&self) -> bool {
        self.data_point_id.is_some()
    }

    /// Rejects attributes whose key is empty, e.g. ones deserialized from a
    /// malformed payload.
    pub(crate) fn validate(&self) -> ModelResult<()> {
        if self.key.is_empty() {
            return Err(ModelError::InvalidArgument(
                "attribute key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
