/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::Path;

use tokio::fs;
use tokio::io::AsyncReadExt;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Return whether this is a multipart ETag, e.g. `"<hex>-<part count>"`.
///
/// Multipart ETags are not the MD5 of the object content.
/// See: https://docs.aws.amazon.com/AmazonS3/latest/userguide/checking-object-integrity.html#large-object-checksums
pub(crate) fn is_multipart(etag: &str) -> bool {
    etag.contains('-')
}

/// Remove the surrounding quotes S3 puts around ETag values.
pub(crate) fn unquote(etag: &str) -> &str {
    etag.trim_matches('"')
}

/// Compute the lowercase hex MD5 digest of the file at `path`.
///
/// The file is read in chunks.
pub(crate) async fn md5_hex(path: &Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path).await?;
    let mut ctx = md5::Context::new();
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        ctx.consume(&buf[..n]);
    }
    Ok(format!("{:x}", ctx.compute()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(
            "d41d8cd98f00b204e9800998ecf8427e",
            unquote("\"d41d8cd98f00b204e9800998ecf8427e\"")
        );
        assert_eq!("abc", unquote("abc"));
    }

    #[test]
    fn test_is_multipart() {
        assert!(is_multipart("9b2cf535f27731c974343645a3985328-3"));
        assert!(!is_multipart("9b2cf535f27731c974343645a3985328"));
    }

    #[tokio::test]
    async fn test_md5_hex_matches_whole_buffer_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        // spans several read buffers
        let data: Vec<u8> = std::iter::repeat_with(|| fastrand::u8(..))
            .take(3 * READ_BUFFER_SIZE + 17)
            .collect();
        std::fs::write(&path, &data).unwrap();

        let expected = format!("{:x}", md5::compute(&data));
        assert_eq!(expected, md5_hex(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_md5_hex_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(
            "d41d8cd98f00b204e9800998ecf8427e",
            md5_hex(&path).await.unwrap()
        );
    }
}
