//! HTTP client for the ViziVault data-protection service.
//!
//! The vault stores personally-identifiable attributes on behalf of entities
//! (users). This crate talks to its REST API:
//! - [`VaultClient::save`] / [`VaultClient::purge`] reconcile an
//!   [`Entity`](vizivault_model::Entity)'s local changes with the vault
//! - thin wrappers for attribute definitions, tags, regulations, search and
//!   single data points
//!
//! Encryption happens on the vault side. The client only forwards the
//! configured keys as `X-Encryption-Key` (attribute writes) and
//! `X-Decryption-Key` (attribute reads) headers.
//!
//! # Example
//!
//! ```no_run
//! use vizivault_client::{VaultClient, VaultConfig};
//! use vizivault_model::Entity;
//!
//! # async fn run() -> vizivault_client::VaultResult<()> {
//! let config = VaultConfig::new("http://localhost:8083", "12345").with_env_fallback();
//! let vault = VaultClient::new(config)?;
//!
//! let mut user = Entity::user("exampleUser");
//! user.add_attribute_value("TestAttribute1", "Example1")?;
//! vault.save(&mut user).await?;
//!
//! let fetched = vault.find_by_user("exampleUser").await?;
//! assert!(fetched.get_attribute("TestAttribute1").is_some());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod sync;

pub use client::{NO_MESSAGE, VaultClient};
pub use config::{DECRYPTION_KEY_ENV, ENCRYPTION_KEY_ENV, VaultConfig};
pub use error::{SaveStage, VaultError, VaultResult};
