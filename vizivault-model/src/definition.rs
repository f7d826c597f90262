use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Scalar value types an attribute definition can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrimitiveSchema {
    #[default]
    #[serde(rename = "string")]
    String,
    #[serde(rename = "int")]
    Integer,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "date")]
    Date,
}

/// Value schema of an attribute definition.
///
/// Structured schemas map field names to nested schemas, e.g. an address
/// with `street`, `city` and `zip` string fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeSchema {
    Primitive(PrimitiveSchema),
    Structured(BTreeMap<String, AttributeSchema>),
}

impl Default for AttributeSchema {
    fn default() -> Self {
        AttributeSchema::Primitive(PrimitiveSchema::default())
    }
}

impl From<PrimitiveSchema> for AttributeSchema {
    fn from(schema: PrimitiveSchema) -> Self {
        AttributeSchema::Primitive(schema)
    }
}

impl AttributeSchema {
    /// Builds a structured schema from `(field, schema)` pairs.
    pub fn structured<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeSchema)>,
        K: Into<String>,
    {
        AttributeSchema::Structured(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Schema for one attribute key: its value type, repeatability and indexing.
///
/// The definition's name doubles as its key; renaming updates both. Creation
/// and modification times are assigned by the vault and never sent back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AttributeDefinitionWire")]
pub struct AttributeDefinition {
    key: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub repeatable: bool,
    pub indexed: bool,
    pub tags: Vec<String>,
    pub schema: AttributeSchema,
    #[serde(skip_serializing)]
    created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    modified_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeDefinitionWire {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    repeatable: Option<bool>,
    #[serde(default)]
    indexed: Option<bool>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    schema: Option<AttributeSchema>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    created_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    modified_date: Option<DateTime<Utc>>,
}

impl From<AttributeDefinitionWire> for AttributeDefinition {
    fn from(wire: AttributeDefinitionWire) -> Self {
        let name = wire.name.or(wire.key).unwrap_or_default();
        Self {
            key: name.clone(),
            name,
            hint: wire.hint,
            repeatable: wire.repeatable.unwrap_or(false),
            indexed: wire.indexed.unwrap_or(false),
            tags: wire.tags.unwrap_or_default(),
            schema: wire.schema.unwrap_or_default(),
            created_at: wire.created_date,
            modified_at: wire.modified_date,
        }
    }
}

impl AttributeDefinition {
    /// Creates a non-repeatable, non-indexed string attribute definition.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            hint: None,
            repeatable: false,
            indexed: false,
            tags: Vec::new(),
            schema: AttributeSchema::default(),
            created_at: None,
            modified_at: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn repeatable(mut self, repeatable: bool) -> Self {
        self.repeatable = repeatable;
        self
    }

    #[must_use]
    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
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
    pub fn with_schema(mut self, schema: impl Into<AttributeSchema>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the definition, keeping key and name in step.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.key = self.name.clone();
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }
}
