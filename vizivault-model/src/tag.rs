use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// A named label that can be attached to entities, attributes and definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(
        rename = "createdDate",
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing
    )]
    created_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "modifiedDate",
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing
    )]
    modified_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: None,
            modified_at: None,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }
}
