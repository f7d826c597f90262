//! Attribute tracking for a single entity.
//!
//! [`AttributeDiffSet`] holds the entity's current view of its attributes and
//! the minimal set of mutations that have not been pushed to the vault yet:
//! - attributes added locally since the last save (tracked by identity)
//! - keys cleared locally since the last save
//! - keys cleared and then re-added, whose old remote values still have to
//!   be deleted before the new ones are uploaded
//!
//! A key is never both live and in [`AttributeDiffSet::deleted_keys`].
//!
//! Attributes live in an arena keyed by a monotonic [`AttributeHandle`], so
//! two attributes with identical fields are still two pending changes.
//!
//! A key starts out singular. The second value added under the same key
//! promotes it to repeated, and it stays repeated for the lifetime of the
//! set, even if it is cleared and re-added later. Whether a key is really
//! repeatable is decided by the vault's attribute definition, not here.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::attribute::Attribute;
use crate::error::{ModelError, ModelResult};

/// Local identity of one attribute inside an [`AttributeDiffSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeHandle(u64);

/// What [`AttributeDiffSet::get`] found under a key.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeEntry<'a> {
    /// The key has only ever held one value.
    One(&'a Attribute),
    /// The key has been promoted to repeated. May hold a single element.
    Many(Vec<&'a Attribute>),
}

impl<'a> AttributeEntry<'a> {
    /// Flattens the entry into a list, regardless of shape.
    pub fn into_vec(self) -> Vec<&'a Attribute> {
        match self {
            AttributeEntry::One(attribute) => vec![attribute],
            AttributeEntry::Many(attributes) => attributes,
        }
    }

    /// Returns the single attribute, or `None` for a repeated key.
    pub fn as_one(&self) -> Option<&'a Attribute> {
        match self {
            AttributeEntry::One(attribute) => Some(attribute),
            AttributeEntry::Many(_) => None,
        }
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, AttributeEntry::Many(_))
    }

    /// Number of values held under the key.
    pub fn len(&self) -> usize {
        match self {
            AttributeEntry::One(_) => 1,
            AttributeEntry::Many(attributes) => attributes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Singular(AttributeHandle),
    Repeated(Vec<AttributeHandle>),
}

impl Slot {
    fn handles(&self) -> &[AttributeHandle] {
        match self {
            Slot::Singular(handle) => std::slice::from_ref(handle),
            Slot::Repeated(handles) => handles,
        }
    }
}

/// Live attribute view plus pending changes for one entity.
#[derive(Debug, Clone, Default)]
pub struct AttributeDiffSet {
    arena: HashMap<AttributeHandle, Attribute>,
    slots: HashMap<String, Slot>,
    /// Keys in first-insertion order.
    key_order: Vec<String>,
    /// Keys that have ever been promoted. Never shrinks.
    repeated_keys: HashSet<String>,
    changed: BTreeSet<AttributeHandle>,
    /// Cleared keys awaiting a remote delete, in clear order.
    deleted: Vec<String>,
    /// Cleared keys that are live again. Still deleted remotely first.
    replaced: Vec<String>,
    next_handle: u64,
}

impl AttributeDiffSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a locally created attribute and records it as a pending change.
    ///
    /// A pending delete for the same key becomes a replacement: the key is
    /// live again, but its old remote values are still deleted on save.
    pub fn add(&mut self, attribute: Attribute) -> ModelResult<AttributeHandle> {
        attribute.validate()?;
        if let Some(pos) = self.deleted.iter().position(|k| k == attribute.key()) {
            let key = self.deleted.remove(pos);
            self.replaced.push(key);
        }
        let handle = self.insert(attribute);
        self.changed.insert(handle);
        Ok(handle)
    }

    /// Coerces a `(key, value)` pair into an attribute and adds it.
    pub fn add_value(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> ModelResult<AttributeHandle> {
        self.add(Attribute::new(key, value)?)
    }

    /// Adds an attribute that the vault already holds. Nothing is marked as
    /// changed, so a following save does not upload it again.
    pub fn insert_persisted(&mut self, attribute: Attribute) -> ModelResult<AttributeHandle> {
        attribute.validate()?;
        Ok(self.insert(attribute))
    }

    fn insert(&mut self, attribute: Attribute) -> AttributeHandle {
        let handle = AttributeHandle(self.next_handle);
        self.next_handle += 1;
        let key = attribute.key().to_string();
        self.arena.insert(handle, attribute);

        match self.slots.get_mut(&key) {
            Some(slot) => match slot {
                Slot::Singular(existing) => {
                    let existing = *existing;
                    *slot = Slot::Repeated(vec![existing, handle]);
                    self.repeated_keys.insert(key);
                }
                Slot::Repeated(handles) => handles.push(handle),
            },
            None => {
                let slot = if self.repeated_keys.contains(&key) {
                    Slot::Repeated(vec![handle])
                } else {
                    Slot::Singular(handle)
                };
                self.slots.insert(key.clone(), slot);
                self.key_order.push(key);
            }
        }
        handle
    }

    /// Looks up the value(s) held under `key`.
    pub fn get(&self, key: &str) -> Option<AttributeEntry<'_>> {
        match self.slots.get(key)? {
            Slot::Singular(handle) => self.arena.get(handle).map(AttributeEntry::One),
            Slot::Repeated(handles) => Some(AttributeEntry::Many(
                handles.iter().filter_map(|h| self.arena.get(h)).collect(),
            )),
        }
    }

    /// Looks up one attribute by its local handle.
    pub fn get_by_handle(&self, handle: AttributeHandle) -> Option<&Attribute> {
        self.arena.get(&handle)
    }

    /// Every attribute in the live view: singular keys first, then repeated
    /// groups, each in key insertion order.
    pub fn get_all(&self) -> Vec<&Attribute> {
        let singular = self.key_order.iter().filter_map(|key| match self.slots.get(key) {
            Some(Slot::Singular(handle)) => self.arena.get(handle),
            _ => None,
        });
        let repeated = self
            .key_order
            .iter()
            .filter_map(|key| match self.slots.get(key) {
                Some(Slot::Repeated(handles)) => Some(handles),
                _ => None,
            })
            .flatten()
            .filter_map(|handle| self.arena.get(handle));
        singular.chain(repeated).collect()
    }

    /// Removes every value under `key` and schedules the key for remote deletion.
    ///
    /// Values under the key that were never uploaded are dropped from the
    /// pending changes as well.
    pub fn clear(&mut self, key: &str) -> ModelResult<()> {
        let slot = self
            .slots
            .remove(key)
            .ok_or_else(|| ModelError::NotFound(key.to_string()))?;

        for handle in slot.handles() {
            self.arena.remove(handle);
            self.changed.remove(handle);
        }
        self.key_order.retain(|k| k != key);
        self.replaced.retain(|k| k != key);
        if !self.deleted.iter().any(|k| k == key) {
            self.deleted.push(key.to_string());
        }
        Ok(())
    }

    /// Drops the whole live view along with all pending changes.
    ///
    /// Used after the vault has removed every attribute of the entity, so
    /// nothing is left to upload or delete.
    pub fn purge(&mut self) {
        self.arena.clear();
        self.slots.clear();
        self.key_order.clear();
        self.changed.clear();
        self.deleted.clear();
        self.replaced.clear();
    }

    /// Attributes added since the last save, in insertion order.
    pub fn changed_attributes(&self) -> Vec<&Attribute> {
        self.changed
            .iter()
            .filter_map(|handle| self.arena.get(handle))
            .collect()
    }

    /// Keys cleared since the last save, in clear order.
    pub fn deleted_keys(&self) -> &[String] {
        &self.deleted
    }

    /// Cleared keys that were added again since the last save. Their old
    /// values must be deleted remotely before the new ones are uploaded.
    pub fn replaced_keys(&self) -> &[String] {
        &self.replaced
    }

    /// Every key that needs a remote delete: cleared keys first, then
    /// replaced ones, each in clear order.
    pub fn pending_deletes(&self) -> Vec<String> {
        self.deleted.iter().chain(&self.replaced).cloned().collect()
    }

    /// Forgets a pending delete once the vault acknowledged it.
    pub fn commit_deleted(&mut self, key: &str) {
        self.deleted.retain(|k| k != key);
        self.replaced.retain(|k| k != key);
    }

    /// Forgets all pending additions once the vault acknowledged them. The
    /// attributes stay in the live view as the new baseline.
    pub fn commit_changed(&mut self) {
        self.changed.clear();
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changed.is_empty() || !self.deleted.is_empty() || !self.replaced.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Number of attribute values in the live view.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
