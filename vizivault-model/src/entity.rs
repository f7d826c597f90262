use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::diff_set::{AttributeDiffSet, AttributeEntry, AttributeHandle};
use crate::error::ModelResult;

/// Which vault collection an entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Entity,
    User,
}

impl EntityKind {
    /// Remote collection name, used as the first path segment of every
    /// entity-scoped endpoint.
    pub const fn collection(self) -> &'static str {
        match self {
            EntityKind::Entity => "entities",
            EntityKind::User => "users",
        }
    }
}

/// Entity-level metadata sent when an entity is upserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An identity on whose behalf attributes are stored in the vault.
///
/// Mutations only touch local state; nothing reaches the vault until the
/// entity is saved. An entity is not synchronized: callers that share one
/// across tasks must make sure only one of them mutates or saves it at a time.
#[derive(Debug, Clone)]
pub struct Entity {
    id: String,
    kind: EntityKind,
    tags: Vec<String>,
    attributes: AttributeDiffSet,
}

impl Entity {
    /// Creates an empty entity in the `entities` collection.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_kind(EntityKind::Entity, id)
    }

    /// Creates an empty user. Users behave exactly like entities but live in
    /// the `users` collection.
    pub fn user(id: impl Into<String>) -> Self {
        Self::with_kind(EntityKind::User, id)
    }

    pub fn with_kind(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            tags: Vec::new(),
            attributes: AttributeDiffSet::new(),
        }
    }

    /// Rebuilds an entity from attributes the vault returned.
    ///
    /// None of them are marked as changed, so saving the result right away
    /// uploads no attributes.
    pub fn from_remote(
        kind: EntityKind,
        id: impl Into<String>,
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> ModelResult<Self> {
        let mut entity = Self::with_kind(kind, id);
        for attribute in attributes {
            entity.attributes.insert_persisted(attribute)?;
        }
        Ok(entity)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_user(&self) -> bool {
        self.kind == EntityKind::User
    }

    pub fn collection(&self) -> &'static str {
        self.kind.collection()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
    }

    /// Appends a tag unless it is already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Metadata body for the entity upsert.
    pub fn metadata(&self) -> EntityMetadata {
        EntityMetadata {
            id: self.id.clone(),
            tags: self.tags.clone(),
        }
    }

    pub fn add_attribute(&mut self, attribute: Attribute) -> ModelResult<AttributeHandle> {
        self.attributes.add(attribute)
    }

    /// Shorthand for adding a bare `(key, value)` pair.
    pub fn add_attribute_value(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> ModelResult<AttributeHandle> {
        self.attributes.add_value(key, value)
    }

    pub fn get_attribute(&self, key: &str) -> Option<AttributeEntry<'_>> {
        self.attributes.get(key)
    }

    pub fn get_attributes(&self) -> Vec<&Attribute> {
        self.attributes.get_all()
    }

    pub fn clear_attribute(&mut self, key: &str) -> ModelResult<()> {
        self.attributes.clear(key)
    }

    /// Drops all local attributes and pending changes.
    pub fn purge(&mut self) {
        self.attributes.purge();
    }

    pub fn attributes(&self) -> &AttributeDiffSet {
        &self.attributes
    }

    /// Mutable access for the sync protocol's commit steps.
    pub fn attributes_mut(&mut self) -> &mut AttributeDiffSet {
        &mut self.attributes
    }

    pub fn changed_attributes(&self) -> Vec<&Attribute> {
        self.attributes.changed_attributes()
    }

    pub fn deleted_keys(&self) -> &[String] {
        self.attributes.deleted_keys()
    }

    /// Keys cleared and re-added since the last save.
    pub fn replaced_keys(&self) -> &[String] {
        self.attributes.replaced_keys()
    }
}
