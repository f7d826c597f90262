//! HTTP transport and the thin request/response wrappers.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use vizivault_model::{
    Attribute, AttributeDefinition, DataEnvelope, DataPointId, Entity, EntityKind, ErrorBody,
    PaginatedSearch, Regulation, SearchRequest, Tag,
};

use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};

pub(crate) const ENCRYPTION_KEY_HEADER: &str = "X-Encryption-Key";
pub(crate) const DECRYPTION_KEY_HEADER: &str = "X-Decryption-Key";

/// Message used when an error response carries no readable `message`.
pub const NO_MESSAGE: &str = "No message provided";

/// Which key header a request carries besides `Authorization`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyHeader {
    None,
    Encryption,
    Decryption,
}

/// Percent-encodes one path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Client for one vault instance.
///
/// Every operation issues its HTTP calls one after another and returns once
/// the last one completes. Nothing is retried: the first failure is returned.
#[derive(Debug, Clone)]
pub struct VaultClient {
    config: VaultConfig,
    http: Client,
}

impl VaultClient {
    /// Creates a client from a validated configuration.
    pub fn new(config: VaultConfig) -> VaultResult<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VaultError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        key: KeyHeader,
    ) -> VaultResult<RequestBuilder> {
        let request = self
            .http
            .request(method, self.config.url(path))
            .header(reqwest::header::AUTHORIZATION, &self.config.api_key);

        Ok(match key {
            KeyHeader::None => request,
            KeyHeader::Encryption => {
                request.header(ENCRYPTION_KEY_HEADER, self.config.require_encryption_key()?)
            }
            KeyHeader::Decryption => {
                request.header(DECRYPTION_KEY_HEADER, self.config.require_decryption_key()?)
            }
        })
    }

    /// Sends a request and returns the body of a successful response.
    async fn send(&self, request: RequestBuilder, method: &Method, path: &str) -> VaultResult<Vec<u8>> {
        debug!("{} {}", method, path);

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!("{} {} failed with {}: {}", method, path, status.as_u16(), message);
            return Err(VaultError::Response {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.to_vec())
    }

    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        key: KeyHeader,
    ) -> VaultResult<T> {
        let request = self.request(Method::GET, path, key)?;
        let body = self.send(request, &Method::GET, path).await?;
        let envelope: DataEnvelope<T> = serde_json::from_slice(&body)?;
        Ok(envelope.into_inner())
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        key: KeyHeader,
    ) -> VaultResult<Vec<u8>> {
        let request = self.request(Method::POST, path, key)?.json(body);
        self.send(request, &Method::POST, path).await
    }

    pub(crate) async fn delete(&self, path: &str) -> VaultResult<()> {
        let request = self.request(Method::DELETE, path, KeyHeader::None)?;
        self.send(request, &Method::DELETE, path).await?;
        Ok(())
    }

    /// Deletes `path`, reporting a vault rejection as `false`.
    async fn delete_if_present(&self, path: &str) -> VaultResult<bool> {
        match self.delete(path).await {
            Ok(()) => Ok(true),
            Err(VaultError::Response { status, .. }) => {
                debug!("DELETE {} rejected with {}, nothing deleted", path, status);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    // ── Entities ────────────────────────────────────────────────

    /// Fetches all attributes of an entity in the `entities` collection.
    pub async fn find_by_entity(&self, entity_id: &str) -> VaultResult<Entity> {
        self.find(EntityKind::Entity, entity_id).await
    }

    /// Fetches all attributes of a user.
    pub async fn find_by_user(&self, user_id: &str) -> VaultResult<Entity> {
        self.find(EntityKind::User, user_id).await
    }

    async fn find(&self, kind: EntityKind, id: &str) -> VaultResult<Entity> {
        let path = format!("/{}/{}/attributes", kind.collection(), segment(id));
        let attributes: Vec<Attribute> = self.get_data(&path, KeyHeader::Decryption).await?;
        debug!("Loaded {} attributes for {}", attributes.len(), id);
        Ok(Entity::from_remote(kind, id, attributes)?)
    }

    /// Fetches one attribute value by its server-assigned id.
    pub async fn get_data_point(&self, data_point_id: &DataPointId) -> VaultResult<Attribute> {
        let path = format!("/data/{}", segment(&data_point_id.to_string()));
        self.get_data(&path, KeyHeader::Decryption).await
    }

    // ── Attribute definitions ───────────────────────────────────

    /// Creates or updates an attribute definition.
    pub async fn store_attribute_definition(
        &self,
        definition: &AttributeDefinition,
    ) -> VaultResult<()> {
        self.post("/attributes", definition, KeyHeader::None).await?;
        Ok(())
    }

    pub async fn get_attribute_definition(&self, key: &str) -> VaultResult<AttributeDefinition> {
        let path = format!("/attributes/{}", segment(key));
        self.get_data(&path, KeyHeader::None).await
    }

    pub async fn get_attribute_definitions(&self) -> VaultResult<Vec<AttributeDefinition>> {
        self.get_data("/attributes", KeyHeader::None).await
    }

    // ── Tags ────────────────────────────────────────────────────

    /// Creates or updates a tag.
    pub async fn store_tag(&self, tag: &Tag) -> VaultResult<()> {
        self.post("/tags", tag, KeyHeader::None).await?;
        Ok(())
    }

    pub async fn get_tag(&self, name: &str) -> VaultResult<Tag> {
        let path = format!("/tags/{}", segment(name));
        self.get_data(&path, KeyHeader::None).await
    }

    pub async fn get_tags(&self) -> VaultResult<Vec<Tag>> {
        self.get_data("/tags/", KeyHeader::None).await
    }

    /// Deletes a tag everywhere it is used.
    ///
    /// Returns `false` instead of an error when the vault rejects the delete,
    /// e.g. because the tag does not exist. Transport failures still error.
    pub async fn delete_tag(&self, name: &str) -> VaultResult<bool> {
        self.delete_if_present(&format!("/tags/{}", segment(name))).await
    }

    // ── Regulations ─────────────────────────────────────────────

    /// Creates or updates a regulation, rule tree included.
    pub async fn store_regulation(&self, regulation: &Regulation) -> VaultResult<()> {
        self.post("/regulations", regulation, KeyHeader::None).await?;
        Ok(())
    }

    pub async fn get_regulation(&self, key: &str) -> VaultResult<Regulation> {
        let path = format!("/regulations/{}", segment(key));
        self.get_data(&path, KeyHeader::None).await
    }

    pub async fn get_regulations(&self) -> VaultResult<Vec<Regulation>> {
        self.get_data("/regulations/", KeyHeader::None).await
    }

    /// Deletes a regulation. Same `false`-on-rejection contract as
    /// [`VaultClient::delete_tag`].
    pub async fn delete_regulation(&self, key: &str) -> VaultResult<bool> {
        self.delete_if_present(&format!("/regulations/{}", segment(key)))
            .await
    }

    // ── Search ──────────────────────────────────────────────────

    /// Runs a search and returns one page of matching attributes.
    pub async fn search(
        &self,
        request: &SearchRequest,
        page: u32,
        count: u32,
    ) -> VaultResult<Vec<Attribute>> {
        let body = PaginatedSearch {
            query: request,
            page,
            count,
        };
        let response = self.post("/search/", &body, KeyHeader::Decryption).await?;
        let envelope: DataEnvelope<Vec<Attribute>> = serde_json::from_slice(&response)?;
        Ok(envelope.into_inner())
    }
}

/// Extracts the `message` of an error body, falling back to [`NO_MESSAGE`].
pub(crate) fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| NO_MESSAGE.to_string())
}
