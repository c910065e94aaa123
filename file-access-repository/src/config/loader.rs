/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_types::os_shim_internal::Env;

use crate::config::{BackendConfig, Config};
use crate::types::StorageType;

const STORAGE_TYPE: &str = "STORAGE_TYPE";
const MINIO_ACCESS_KEY: &str = "MINIO_ACCESS_KEY";
const MINIO_SECRET_KEY: &str = "MINIO_SECRET_KEY";
const MINIO_ENDPOINT: &str = "MINIO_ENDPOINT";
const MINIO_SECURE: &str = "MINIO_SECURE";
const MINIO_CERT_CHECK: &str = "MINIO_CERT_CHECK";
const MINIO_REGION: &str = "MINIO_REGION";

/// Load [`Config`] from the environment.
///
/// Values set on the loader take precedence over the environment.
#[derive(Default, Debug)]
pub struct ConfigLoader {
    env: Option<Env>,
    storage_type: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    endpoint: Option<String>,
    secure: Option<bool>,
    cert_check: Option<bool>,
    region: Option<String>,
}

impl ConfigLoader {
    /// Override the environment variables are read from. Defaults to the process environment.
    pub fn env(mut self, env: Env) -> Self {
        self.env = Some(env);
        self
    }

    /// Override `STORAGE_TYPE`
    pub fn storage_type(mut self, storage_type: impl Into<String>) -> Self {
        self.storage_type = Some(storage_type.into());
        self
    }

    /// Override `MINIO_ACCESS_KEY`
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// Override `MINIO_SECRET_KEY`
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Override `MINIO_ENDPOINT`
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override `MINIO_SECURE`
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Override `MINIO_CERT_CHECK`
    pub fn cert_check(mut self, cert_check: bool) -> Self {
        self.cert_check = Some(cert_check);
        self
    }

    /// Override `MINIO_REGION`
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Load the configuration
    ///
    /// If fields have been overridden during loader construction, the override values will be
    /// used. Otherwise, the environment value or the default for each field will be provided.
    pub fn load(self) -> Config {
        let env = self.env.unwrap_or_else(Env::real);
        let var = |key: &str| env.get(key).ok();

        let storage_type = self
            .storage_type
            .or_else(|| var(STORAGE_TYPE))
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| StorageType::default().as_str().to_owned());

        let mut object_store = BackendConfig::builder()
            .secure(self.secure.unwrap_or_else(|| is_true(var(MINIO_SECURE))))
            .cert_check(
                self.cert_check
                    .unwrap_or_else(|| is_true(var(MINIO_CERT_CHECK))),
            );
        if let Some(access_key) = self.access_key.or_else(|| var(MINIO_ACCESS_KEY)) {
            object_store = object_store.access_key(access_key);
        }
        if let Some(secret_key) = self.secret_key.or_else(|| var(MINIO_SECRET_KEY)) {
            object_store = object_store.secret_key(secret_key);
        }
        if let Some(endpoint) = self.endpoint.or_else(|| var(MINIO_ENDPOINT)) {
            object_store = object_store.endpoint(endpoint);
        }
        if let Some(region) = self.region.or_else(|| var(MINIO_REGION)) {
            object_store = object_store.region(region);
        }

        tracing::debug!(%storage_type, "loaded storage configuration");
        Config::builder()
            .storage_type(storage_type)
            .object_store(object_store.build())
            .build()
    }
}

/// Flags are on only when the value is `true`, ignoring case. Unset or anything else is off.
fn is_true(value: Option<String>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::{is_true, ConfigLoader};
    use aws_types::os_shim_internal::Env;

    #[test]
    fn test_truthy_convention() {
        assert!(is_true(Some("true".to_owned())));
        assert!(is_true(Some("TRUE".to_owned())));
        assert!(!is_true(Some("1".to_owned())));
        assert!(!is_true(Some("yes".to_owned())));
        assert!(!is_true(None));
    }

    #[test]
    fn test_load_empty_env_uses_defaults() {
        let config = ConfigLoader::default().env(Env::from_slice(&[])).load();
        assert_eq!("local", config.storage_type());
        let store = config.object_store();
        assert_eq!(None, store.access_key());
        assert_eq!(None, store.endpoint());
        assert!(!store.secure());
        assert!(!store.cert_check());
    }

    #[test]
    fn test_load_from_env() {
        let env = Env::from_slice(&[
            ("STORAGE_TYPE", "MinIO"),
            ("MINIO_ACCESS_KEY", "minioadmin"),
            ("MINIO_SECRET_KEY", "miniosecret"),
            ("MINIO_ENDPOINT", "localhost:9000"),
            ("MINIO_SECURE", "True"),
            ("MINIO_CERT_CHECK", "false"),
            ("MINIO_REGION", "eu-west-1"),
        ]);
        let config = ConfigLoader::default().env(env).load();

        assert_eq!("minio", config.storage_type());
        let store = config.object_store();
        assert_eq!(Some("minioadmin"), store.access_key());
        assert_eq!(Some("miniosecret"), store.secret_key());
        assert_eq!(Some("localhost:9000"), store.endpoint());
        assert!(store.secure());
        assert!(!store.cert_check());
        assert_eq!("eu-west-1", store.region());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let env = Env::from_slice(&[("STORAGE_TYPE", "local"), ("MINIO_SECURE", "true")]);
        let config = ConfigLoader::default()
            .env(env)
            .storage_type("minio")
            .secure(false)
            .endpoint("127.0.0.1:9000")
            .load();

        assert_eq!("minio", config.storage_type());
        assert!(!config.object_store().secure());
        assert_eq!(Some("127.0.0.1:9000"), config.object_store().endpoint());
    }
}
