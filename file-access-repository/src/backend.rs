/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::Path;

use crate::error::Error;

/// Backend that treats the caller's paths as the files themselves
pub mod local;

/// Backend for S3-compatible object stores
pub mod object_store;

pub use self::local::LocalBackend;
pub use self::object_store::ObjectStoreBackend;

/// Access to files identified by a `file_type` (bucket) and a `file_name` (key).
///
/// All operations block until complete.
///
/// # Panics
///
/// [`ObjectStoreBackend`] drives its requests on an internal tokio runtime, so calling any
/// of its operations from within an async context panics. Async code should use
/// [`ObjectStoreBackend::fetch`], [`ObjectStoreBackend::store`] and
/// [`ObjectStoreBackend::remove`] instead, or call these from
/// [`tokio::task::spawn_blocking`].
pub trait StorageBackend: Send + Sync {
    /// Retrieve `file_type/file_name` and save it at `to_path`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::IOError`](crate::error::ErrorKind::IOError) if the file cannot be read
    /// from storage or written locally, including when it does not exist remotely.
    fn get_file(&self, file_type: &str, file_name: &str, to_path: &Path) -> Result<(), Error>;

    /// Store the local file at `from_path` as `file_type/file_name`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::IOError`](crate::error::ErrorKind::IOError) if the file cannot be written.
    fn put_file(&self, file_type: &str, file_name: &str, from_path: &Path) -> Result<(), Error>;

    /// Delete `file_type/file_name`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if `file_type` does not exist,
    /// [`ErrorKind::IOError`](crate::error::ErrorKind::IOError) for any other failure.
    fn delete_file(&self, file_type: &str, file_name: &str) -> Result<(), Error>;

    /// Short name of the backend, for logging.
    fn backend_type(&self) -> &'static str;
}

/// A backend chosen at runtime by [`BackendFactory`](crate::factory::BackendFactory).
#[derive(Debug)]
pub enum Backend {
    /// Local filesystem backend
    Local(LocalBackend),
    /// Object store backend
    ObjectStore(ObjectStoreBackend),
}

impl Backend {
    /// Get a reference to the underlying backend trait object.
    pub fn as_backend(&self) -> &dyn StorageBackend {
        match self {
            Backend::Local(b) => b,
            Backend::ObjectStore(b) => b,
        }
    }
}

impl StorageBackend for Backend {
    fn get_file(&self, file_type: &str, file_name: &str, to_path: &Path) -> Result<(), Error> {
        self.as_backend().get_file(file_type, file_name, to_path)
    }

    fn put_file(&self, file_type: &str, file_name: &str, from_path: &Path) -> Result<(), Error> {
        self.as_backend().put_file(file_type, file_name, from_path)
    }

    fn delete_file(&self, file_type: &str, file_name: &str) -> Result<(), Error> {
        self.as_backend().delete_file(file_type, file_name)
    }

    fn backend_type(&self) -> &'static str {
        self.as_backend().backend_type()
    }
}
