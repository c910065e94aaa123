/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::Path;

use crate::backend::StorageBackend;
use crate::error::Error;

/// Backend for files that already live on the local filesystem.
///
/// The caller's `to_path`/`from_path` is assumed to be the file's real location, so there is
/// nothing to transfer. Every operation succeeds without touching the filesystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalBackend;

impl LocalBackend {
    /// Create a new local backend
    pub fn new() -> Self {
        LocalBackend
    }
}

impl StorageBackend for LocalBackend {
    fn get_file(&self, _file_type: &str, _file_name: &str, _to_path: &Path) -> Result<(), Error> {
        Ok(())
    }

    fn put_file(&self, _file_type: &str, _file_name: &str, _from_path: &Path) -> Result<(), Error> {
        Ok(())
    }

    fn delete_file(&self, _file_type: &str, _file_name: &str) -> Result<(), Error> {
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "local"
    }
}
