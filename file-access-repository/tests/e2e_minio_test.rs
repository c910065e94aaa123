/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

// Runs against a live MinIO configured through the MINIO_* environment variables:
// RUSTFLAGS="--cfg e2e_test" cargo test --test e2e_minio_test
#![cfg(e2e_test)]

use file_access_repository::{BackendFactory, StorageBackend};
use test_common::create_test_file;

fn bucket_name() -> String {
    format!("file-access-e2e-{}", fastrand::u32(..))
}

#[test]
fn test_round_trip() {
    let backend = BackendFactory::from_env(Some("minio")).unwrap();
    let bucket = bucket_name();
    let contents: Vec<u8> = "This is a test".bytes().cycle().take(64 * 1024).collect();

    let (tmp, from_path) = create_test_file("a.txt", &contents);
    backend.put_file(&bucket, "a.txt", &from_path).unwrap();

    let to_path = tmp.path().join("download").join("a.txt");
    backend.get_file(&bucket, "a.txt", &to_path).unwrap();
    assert_eq!(contents, std::fs::read(&to_path).unwrap());

    // identical local copy, left untouched
    let modified = std::fs::metadata(&to_path).unwrap().modified().unwrap();
    backend.get_file(&bucket, "a.txt", &to_path).unwrap();
    assert_eq!(
        modified,
        std::fs::metadata(&to_path).unwrap().modified().unwrap()
    );

    backend.delete_file(&bucket, "a.txt").unwrap();
    let err = backend
        .get_file(&bucket, "a.txt", &tmp.path().join("gone.txt"))
        .unwrap_err();
    assert!(!err.is_not_found());
}

#[test]
fn test_delete_from_missing_bucket() {
    let backend = BackendFactory::from_env(Some("minio")).unwrap();
    let err = backend.delete_file(&bucket_name(), "a.txt").unwrap_err();
    assert!(err.is_not_found());
}
