/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::str::FromStr;

use crate::error::{self, Error};

/// The kind of storage a [`Backend`](crate::backend::Backend) is built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageType {
    /// Files already live at the caller's paths, see [`LocalBackend`](crate::backend::local::LocalBackend).
    #[default]
    Local,

    /// An S3-compatible object store such as MinIO, see
    /// [`ObjectStoreBackend`](crate::backend::object_store::ObjectStoreBackend).
    Minio,
}

impl StorageType {
    /// The selector string for this storage type.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Local => "local",
            StorageType::Minio => "minio",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = Error;

    /// Parse a selector, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(StorageType::Local),
            "minio" => Ok(StorageType::Minio),
            _ => Err(error::invalid_configuration(format!(
                "Invalid storage type: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StorageType;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!(StorageType::Local, "local".parse().unwrap());
        assert_eq!(StorageType::Local, "LOCAL".parse().unwrap());
        assert_eq!(StorageType::Minio, "MinIO".parse().unwrap());
    }

    #[test]
    fn test_parse_rejects_unknown_selector() {
        let err = "gcs".parse::<StorageType>().unwrap_err();
        assert_eq!(ErrorKind::InvalidConfiguration, *err.kind());
        assert!(err.to_string().contains("gcs"));

        // no trimming is applied to selectors
        assert!(" local".parse::<StorageType>().is_err());
    }
}
