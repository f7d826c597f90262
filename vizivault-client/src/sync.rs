//! Reconciling an entity's local changes with the vault.
//!
//! # Save
//!
//! 1. Each cleared key is deleted remotely, one call per key, in clear order.
//!    Keys that were cleared and then added again are deleted too, so their
//!    old values do not survive next to the new ones. A key leaves the local
//!    pending deletes as soon as its delete succeeds.
//! 2. The entity's metadata (`id`, `tags`) is upserted to its collection.
//! 3. Attributes added since the last save are uploaded as one batch under the
//!    encryption key. An empty batch is not sent.
//! 4. The local changed set is cleared.
//!
//! There is no rollback. When a phase fails, the error names it
//! ([`SaveStage`]) and the entity keeps exactly the changes the vault has not
//! acknowledged, so calling save again resumes where the failed call stopped.
//! In between, the vault holds a partial result: e.g. deletions applied while
//! the matching upserts are still missing.
//!
//! # Purge
//!
//! Removes all attribute data of an entity in one call. The entity's own
//! metadata record stays in the vault.

use tracing::info;
use vizivault_model::{DataEnvelope, Entity};

use crate::client::{KeyHeader, VaultClient, segment};
use crate::error::{SaveStage, VaultResult};

impl VaultClient {
    /// Pushes the entity's pending deletions and additions to the vault.
    ///
    /// On success the entity has no pending changes left.
    pub async fn save(&self, entity: &mut Entity) -> VaultResult<()> {
        let collection = entity.collection();
        let id = entity.id().to_string();
        let id_segment = segment(&id);

        // Fail before touching the vault if the upload could never be sent.
        if !entity.changed_attributes().is_empty() {
            self.config().require_encryption_key()?;
        }

        let pending_deletes = entity.attributes().pending_deletes();
        for key in &pending_deletes {
            let path = format!("/{collection}/{id_segment}/attributes/{}", segment(key));
            self.delete(&path)
                .await
                .map_err(|e| e.during_save(&id, SaveStage::DeleteAttribute(key.clone())))?;
            entity.attributes_mut().commit_deleted(key);
        }

        self.post(&format!("/{collection}"), &entity.metadata(), KeyHeader::None)
            .await
            .map_err(|e| e.during_save(&id, SaveStage::UpsertMetadata))?;

        let uploaded = {
            let changed = entity.changed_attributes();
            let count = changed.len();
            if count > 0 {
                let batch = DataEnvelope::new(changed);
                self.post(
                    &format!("/{collection}/{id_segment}/attributes"),
                    &batch,
                    KeyHeader::Encryption,
                )
                .await
                .map_err(|e| e.during_save(&id, SaveStage::UpsertAttributes))?;
            }
            count
        };
        entity.attributes_mut().commit_changed();

        info!(
            "Saved {} {}: {} deleted, {} uploaded",
            collection,
            id,
            pending_deletes.len(),
            uploaded
        );
        Ok(())
    }

    /// Deletes every attribute of the entity in the vault, then drops the
    /// local attributes and pending changes.
    pub async fn purge(&self, entity: &mut Entity) -> VaultResult<()> {
        let path = format!("/{}/{}/data", entity.collection(), segment(entity.id()));
        self.delete(&path).await?;
        entity.purge();

        info!("Purged {} {}", entity.collection(), entity.id());
        Ok(())
    }
}
