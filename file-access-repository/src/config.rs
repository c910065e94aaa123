/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use crate::types::StorageType;

/// Load configuration from the process environment
pub mod loader;

/// Signing region used when none is configured. MinIO accepts any region.
pub(crate) const DEFAULT_REGION: &str = "us-east-1";

/// Everything [`BackendFactory`](crate::factory::BackendFactory) needs to construct a backend.
#[derive(Debug, Clone)]
pub struct Config {
    storage_type: String,
    object_store: BackendConfig,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The storage type selector used when the caller does not give one explicitly.
    ///
    /// This is kept verbatim and only validated when a backend is created.
    pub fn storage_type(&self) -> &str {
        &self.storage_type
    }

    /// Connection settings for the object store backend
    pub fn object_store(&self) -> &BackendConfig {
        &self.object_store
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    storage_type: Option<String>,
    object_store: Option<BackendConfig>,
}

impl Builder {
    /// Set the default storage type selector, e.g. `"local"` or `"minio"`.
    ///
    /// Default is `"local"`.
    pub fn storage_type(mut self, storage_type: impl Into<String>) -> Self {
        self.storage_type = Some(storage_type.into());
        self
    }

    /// Set the object store connection settings.
    pub fn object_store(mut self, object_store: BackendConfig) -> Self {
        self.object_store = Some(object_store);
        self
    }

    /// Consumes the builder and constructs a [`Config`]
    pub fn build(self) -> Config {
        Config {
            storage_type: self
                .storage_type
                .unwrap_or_else(|| StorageType::default().as_str().to_owned()),
            object_store: self.object_store.unwrap_or_default(),
        }
    }
}

/// Connection settings for an S3-compatible object store.
///
/// Immutable once built; an [`ObjectStoreBackend`](crate::backend::object_store::ObjectStoreBackend)
/// takes its own copy.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    access_key: Option<String>,
    secret_key: Option<String>,
    endpoint: Option<String>,
    secure: bool,
    cert_check: bool,
    region: Option<String>,
}

impl BackendConfig {
    /// Create a new `BackendConfig` builder
    pub fn builder() -> BackendConfigBuilder {
        BackendConfigBuilder::default()
    }

    /// The access key (user name) to sign requests with
    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    /// The secret key to sign requests with
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    /// The endpoint, either `host[:port]` or a full URL
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Whether to connect over TLS
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Whether the server's TLS certificate is validated
    pub fn cert_check(&self) -> bool {
        self.cert_check
    }

    /// The signing region
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// The endpoint as a URL.
    ///
    /// A bare `host[:port]` gets an `https://` or `http://` scheme depending on [`secure`](Self::secure).
    pub fn endpoint_url(&self) -> Option<String> {
        let endpoint = self.endpoint.as_deref()?;
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Some(endpoint.to_owned());
        }
        let scheme = if self.secure { "https" } else { "http" };
        Some(format!("{scheme}://{endpoint}"))
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "** redacted **"))
            .field("endpoint", &self.endpoint)
            .field("secure", &self.secure)
            .field("cert_check", &self.cert_check)
            .field("region", &self.region)
            .finish()
    }
}

/// Fluent style builder for [BackendConfig]
#[derive(Debug, Clone, Default)]
pub struct BackendConfigBuilder {
    inner: BackendConfig,
}

impl BackendConfigBuilder {
    /// Set the access key
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.inner.access_key = Some(access_key.into());
        self
    }

    /// Set the secret key
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.inner.secret_key = Some(secret_key.into());
        self
    }

    /// Set the endpoint, e.g. `localhost:9000` or `https://minio.internal`
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.inner.endpoint = Some(endpoint.into());
        self
    }

    /// Connect over TLS. Default is `false`.
    pub fn secure(mut self, secure: bool) -> Self {
        self.inner.secure = secure;
        self
    }

    /// Validate the server's TLS certificate. Default is `false`.
    pub fn cert_check(mut self, cert_check: bool) -> Self {
        self.inner.cert_check = cert_check;
        self
    }

    /// Set the signing region. Default is `us-east-1`.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.inner.region = Some(region.into());
        self
    }

    /// Consumes the builder and constructs a [`BackendConfig`]
    pub fn build(self) -> BackendConfig {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendConfig, Config};

    #[test]
    fn test_defaults() {
        let config = Config::builder().build();
        assert_eq!("local", config.storage_type());
        assert!(!config.object_store().secure());
        assert!(!config.object_store().cert_check());
        assert_eq!("us-east-1", config.object_store().region());
        assert_eq!(None, config.object_store().endpoint_url());
    }

    #[test]
    fn test_endpoint_url_scheme_follows_secure_flag() {
        let plain = BackendConfig::builder().endpoint("localhost:9000").build();
        assert_eq!(Some("http://localhost:9000".to_owned()), plain.endpoint_url());

        let tls = BackendConfig::builder()
            .endpoint("minio.internal")
            .secure(true)
            .build();
        assert_eq!(Some("https://minio.internal".to_owned()), tls.endpoint_url());

        let explicit = BackendConfig::builder()
            .endpoint("http://127.0.0.1:9000")
            .secure(true)
            .build();
        assert_eq!(
            Some("http://127.0.0.1:9000".to_owned()),
            explicit.endpoint_url()
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = BackendConfig::builder()
            .access_key("minioadmin")
            .secret_key("hunter2")
            .build();
        let debug = format!("{config:?}");
        assert!(debug.contains("minioadmin"));
        assert!(!debug.contains("hunter2"));
    }
}
