/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Uniform access to files that are kept either on the local filesystem or in an
//! S3-compatible object store such as [MinIO].
//!
//! Callers address a file by a `file_type` and a `file_name` and move it between storage and
//! a local path through the [`StorageBackend`](crate::backend::StorageBackend) trait. Which
//! backend is used is decided at runtime by [`BackendFactory`](crate::factory::BackendFactory).
//!
//! For the object store, `file_type` is the bucket and `file_name` the object key. Downloads
//! are skipped when the local file already has the remote content, and uploads create the
//! bucket when it is missing.
//!
//! [MinIO]: https://min.io/
//!
//! # Examples
//!
//! Pick the backend named by `STORAGE_TYPE` and fetch a file:
//!
//! ```no_run
//! # fn example() -> Result<(), file_access_repository::error::Error> {
//! use file_access_repository::backend::StorageBackend;
//! use file_access_repository::factory::BackendFactory;
//! use std::path::Path;
//!
//! let backend = BackendFactory::from_env(None)?;
//! backend.get_file("docs", "a.txt", Path::new("/tmp/a.txt"))?;
//! # Ok(())
//! # }
//! ```
//!
//! Configuration can also be assembled explicitly:
//!
//! ```no_run
//! # fn example() -> Result<(), file_access_repository::error::Error> {
//! use file_access_repository::config::BackendConfig;
//! use file_access_repository::factory::BackendFactory;
//! use file_access_repository::Config;
//!
//! let config = Config::builder()
//!     .object_store(
//!         BackendConfig::builder()
//!             .endpoint("localhost:9000")
//!             .access_key("minioadmin")
//!             .secret_key("minioadmin")
//!             .build(),
//!     )
//!     .build();
//! let backend = BackendFactory::create(Some("minio"), &config)?;
//! # Ok(())
//! # }
//! ```

/// Error types emitted by `file-access-repository`
pub mod error;

/// Common types used by `file-access-repository`
pub mod types;

/// Storage backends
pub mod backend;

/// Backend selection
pub mod factory;

/// Backend configuration
pub mod config;

/// Content digests used to decide whether a download can be skipped
pub(crate) mod checksum;

/// HTTP related components and utils
pub(crate) mod http;

pub use self::backend::{Backend, StorageBackend};
use self::config::loader::ConfigLoader;
pub use self::config::Config;
pub use self::factory::BackendFactory;

/// Create a config loader that reads the process environment.
///
/// Variables read: `STORAGE_TYPE`, `MINIO_ACCESS_KEY`, `MINIO_SECRET_KEY`, `MINIO_ENDPOINT`,
/// `MINIO_SECURE`, `MINIO_CERT_CHECK` and `MINIO_REGION`.
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
