//! Client configuration.
//!
//! Encryption and decryption keys resolve with a fixed precedence:
//! an explicitly set key wins, otherwise the environment value
//! ([`ENCRYPTION_KEY_ENV`] / [`DECRYPTION_KEY_ENV`]) is used, otherwise the
//! key stays unset. Environment lookup only happens when the caller asks for
//! it through [`VaultConfig::with_env_fallback`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};

/// Environment variable consulted for the encryption key.
pub const ENCRYPTION_KEY_ENV: &str = "VV_ENCRYPT_KEY";
/// Environment variable consulted for the decryption key.
pub const DECRYPTION_KEY_ENV: &str = "VV_DECRYPT_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Connection settings for a vault instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Base URL of the vault API (e.g. `http://localhost:8083`).
    pub base_url: String,
    /// Sent verbatim in the `Authorization` header of every call.
    pub api_key: String,
    /// Sent as `X-Encryption-Key` when attribute values are written.
    #[serde(default)]
    pub encryption_key: Option<String>,
    /// Sent as `X-Decryption-Key` when attribute values are read.
    #[serde(default)]
    pub decryption_key: Option<String>,
    /// Per-request timeout applied by the transport.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8083".to_string(),
            api_key: String::new(),
            encryption_key: None,
            decryption_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() { "<redacted>" } else { "<unset>" }
        }
        f.debug_struct("VaultConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("encryption_key", &redact(&self.encryption_key))
            .field("decryption_key", &redact(&self.decryption_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl VaultConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_decryption_key(mut self, key: impl Into<String>) -> Self {
        self.decryption_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Fills unset keys from the process environment.
    #[must_use]
    pub fn with_env_fallback(self) -> Self {
        self.with_key_fallback(|name| std::env::var(name).ok())
    }

    /// Fills unset keys from `lookup`, called with the environment variable
    /// name of each missing key. Empty values count as unset.
    #[must_use]
    pub fn with_key_fallback<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |name: &str| lookup(name).filter(|value| !value.is_empty());
        if self.encryption_key.is_none() {
            self.encryption_key = resolve(ENCRYPTION_KEY_ENV);
        }
        if self.decryption_key.is_none() {
            self.decryption_key = resolve(DECRYPTION_KEY_ENV);
        }
        self
    }

    /// Checks that the configuration can be used to build a client.
    pub fn validate(&self) -> VaultResult<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(VaultError::Config("base URL must not be empty".to_string()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(VaultError::Config(format!(
                "base URL must start with http:// or https://: {base}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(VaultError::Config("timeout must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Joins `path` (which starts with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim().trim_end_matches('/'), path)
    }

    pub(crate) fn require_encryption_key(&self) -> VaultResult<&str> {
        self.encryption_key
            .as_deref()
            .ok_or_else(|| VaultError::Config("encryption key not configured".to_string()))
    }

    pub(crate) fn require_decryption_key(&self) -> VaultResult<&str> {
        self.decryption_key
            .as_deref()
            .ok_or_else(|| VaultError::Config("decryption key not configured".to_string()))
    }
}
