//! Domain model for the ViziVault client.
//!
//! Defines the types exchanged with the vault and the local change tracking
//! that decides what a save has to send:
//! - [`Attribute`]: one typed, timestamped data point of an entity
//! - [`AttributeDiffSet`]: live attribute view plus pending additions/deletions
//! - [`Entity`]: the aggregate root (users are entities in the `users` collection)
//! - [`AttributeDefinition`], [`Tag`], [`Regulation`]: vault-wide schema and policy
//! - [`SearchRequest`]: query descriptor for attribute search
//!
//! Nothing here performs I/O. Serialization follows the vault's camelCase
//! wire format.

mod attribute;
mod definition;
mod diff_set;
mod entity;
mod envelope;
mod error;
mod regulation;
mod search;
mod tag;
mod timestamp;

pub use attribute::{Attribute, DataPointId};
pub use definition::{AttributeDefinition, AttributeSchema, PrimitiveSchema};
pub use diff_set::{AttributeDiffSet, AttributeEntry, AttributeHandle};
pub use entity::{Entity, EntityKind, EntityMetadata};
pub use envelope::{AttributeBatch, DataEnvelope, ErrorBody};
pub use error::{ModelError, ModelResult};
pub use regulation::{
    AttributeListOperator, Regulation, RegulationRule, TagListOperator, UserValuePredicate,
};
pub use search::{PaginatedSearch, SearchRequest, ValueQuery};
pub use tag::Tag;
