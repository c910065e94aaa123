/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::backend::{Backend, LocalBackend, ObjectStoreBackend};
use crate::config::Config;
use crate::error::Error;
use crate::types::StorageType;

/// Creates the [`Backend`] for a storage type selector.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct BackendFactory;

impl BackendFactory {
    /// Create a backend.
    ///
    /// `storage_type` is matched ignoring case against `"local"` and `"minio"`. When it is
    /// `None`, [`Config::storage_type`] is used instead. A new backend is returned on every
    /// call.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidConfiguration`](crate::error::ErrorKind::InvalidConfiguration) if
    /// the selector is not recognized or the object store settings are incomplete.
    pub fn create(storage_type: Option<&str>, config: &Config) -> Result<Backend, Error> {
        let storage_type: StorageType = storage_type.unwrap_or(config.storage_type()).parse()?;
        let backend = match storage_type {
            StorageType::Minio => {
                tracing::info!("Using MinIO storage");
                Backend::ObjectStore(ObjectStoreBackend::new(config.object_store())?)
            }
            StorageType::Local => {
                tracing::info!("Using local storage");
                Backend::Local(LocalBackend::new())
            }
        };
        Ok(backend)
    }

    /// Create a backend configured from the process environment.
    ///
    /// See [`from_env`](crate::from_env) for the variables read.
    pub fn from_env(storage_type: Option<&str>) -> Result<Backend, Error> {
        Self::create(storage_type, &crate::from_env().load())
    }
}
