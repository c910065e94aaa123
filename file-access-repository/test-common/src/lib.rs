/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::PathBuf;
use tempfile::TempDir;

/// Build a mocked S3 client from the given rules whose HTTP layer always answers `200`.
///
/// The calling crate must depend on `aws-smithy-mocks-experimental`, `aws-smithy-runtime`
/// (with `test-util`) and `http` 0.2 (renamed `http_02x`).
#[macro_export]
macro_rules! mock_client_with_stubbed_http_client {
    ($aws_crate: ident, $rules: expr) => {
        $crate::mock_client_with_stubbed_http_client!(
            $aws_crate,
            aws_smithy_mocks_experimental::RuleMode::Sequential,
            $rules
        )
    };
    ($aws_crate: ident, $rule_mode: expr, $rules: expr) => {{
        let client = aws_smithy_mocks_experimental::mock_client!($aws_crate, $rule_mode, $rules);
        $aws_crate::Client::from_conf(
            client
                .config()
                .to_builder()
                .http_client(
                    aws_smithy_runtime::client::http::test_util::infallible_client_fn(|_req| {
                        http_02x::Response::builder().status(200).body("").unwrap()
                    }),
                )
                .build(),
        )
    }};
}

/// Create a temporary directory holding a single file `name` with the given contents.
///
/// Returns the directory guard together with the full path of the file.
pub fn create_test_file(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

/// The quoted ETag S3 reports for an object uploaded in a single part.
pub fn single_part_etag(contents: &[u8]) -> String {
    format!("\"{:x}\"", md5::compute(contents))
}
