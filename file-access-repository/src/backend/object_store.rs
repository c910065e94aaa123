/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::runtime::Runtime;
use tracing::Instrument;

use crate::backend::StorageBackend;
use crate::checksum;
use crate::config::{BackendConfig, DEFAULT_REGION};
use crate::error::{self, Error, ErrorKind};
use crate::http;

const CREDENTIALS_PROVIDER_NAME: &str = "file-access-repository";

/// Size and ETag of a remote object as reported by `HeadObject`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ObjectStat {
    pub(crate) size: Option<u64>,
    pub(crate) e_tag: Option<String>,
}

/// Outcome of looking up a remote object before downloading it.
#[derive(Debug)]
pub(crate) enum RemoteStat {
    Found(ObjectStat),
    NotFound,
    TransportError(Error),
}

/// Backend for an S3-compatible object store such as MinIO.
///
/// `file_type` is the bucket and `file_name` the object key.
///
/// The [`StorageBackend`] methods block on a runtime owned by the backend, created on first
/// use. They must not be called from within an async context; use [`fetch`](Self::fetch),
/// [`store`](Self::store) and [`remove`](Self::remove) there instead. A backend that is
/// only used through those never creates its runtime.
#[derive(Debug)]
pub struct ObjectStoreBackend {
    client: aws_sdk_s3::Client,
    region: String,
    runtime: OnceLock<Runtime>,
}

impl ObjectStoreBackend {
    /// Connect to the object store described by `config`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidConfiguration`] if the endpoint or credentials are missing.
    ///
    /// No request is sent, so this is safe to call from async code.
    pub fn new(config: &BackendConfig) -> Result<Self, Error> {
        let endpoint_url = config.endpoint_url().ok_or_else(|| {
            error::invalid_configuration("object store endpoint is not set (MINIO_ENDPOINT)")
        })?;
        let (Some(access_key), Some(secret_key)) = (config.access_key(), config.secret_key())
        else {
            return Err(error::invalid_configuration(
                "object store credentials are not set (MINIO_ACCESS_KEY, MINIO_SECRET_KEY)",
            ));
        };

        let mut s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                CREDENTIALS_PROVIDER_NAME,
            ))
            .region(Region::new(config.region().to_owned()))
            .endpoint_url(&endpoint_url)
            .force_path_style(true);
        if config.secure() && !config.cert_check() {
            tracing::warn!(%endpoint_url, "TLS certificate validation is disabled");
            s3_config = s3_config.http_client(http::unverified_tls_client());
        }

        tracing::debug!(%endpoint_url, region = config.region(), "created object store client");
        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(s3_config.build()),
            region: config.region().to_owned(),
            runtime: OnceLock::new(),
        })
    }

    /// Use an already configured S3 client.
    pub fn from_client(client: aws_sdk_s3::Client) -> Self {
        let region = client
            .config()
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| DEFAULT_REGION.to_owned());
        Self {
            client,
            region,
            runtime: OnceLock::new(),
        }
    }

    /// The S3 client used to send requests.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }

    /// Download `file_type/file_name` to `to_path` unless `to_path` already holds the same content.
    ///
    /// A local file is considered the same when its size equals the remote size and its MD5
    /// equals the remote ETag. When the remote metadata can't be retrieved the file is
    /// downloaded.
    pub async fn fetch(
        &self,
        file_type: &str,
        file_name: &str,
        to_path: &Path,
    ) -> Result<(), Error> {
        if fs::try_exists(to_path).await.unwrap_or(false)
            && self.matches_remote(file_type, file_name, to_path).await
        {
            tracing::info!(
                "File {} already exists and is identical to {file_type}/{file_name}. Skipping download.",
                to_path.display()
            );
            return Ok(());
        }

        let written = self
            .download(file_type, file_name, to_path)
            .await
            .map_err(error::io_error(format!("{file_type}/{file_name}")))?;
        tracing::info!(
            bytes = written,
            "Object {file_name} successfully downloaded from bucket {file_type} to local file {}",
            to_path.display()
        );
        Ok(())
    }

    /// Upload `from_path` as `file_type/file_name`, creating the bucket first if needed.
    ///
    /// The upload always happens, even if the remote object already has the same content.
    pub async fn store(
        &self,
        file_type: &str,
        file_name: &str,
        from_path: &Path,
    ) -> Result<(), Error> {
        let context = format!("{} -> {file_type}/{file_name}", from_path.display());

        self.ensure_bucket(file_type)
            .await
            .map_err(error::io_error(context.as_str()))?;

        let body = ByteStream::from_path(from_path)
            .await
            .map_err(error::io_error(context.as_str()))?;
        self.client
            .put_object()
            .bucket(file_type)
            .key(file_name)
            .body(body)
            .send()
            .await
            .map_err(error::io_error(context.as_str()))?;

        tracing::info!(
            "{} successfully uploaded as object {file_name} to bucket {file_type}",
            from_path.display()
        );
        Ok(())
    }

    /// Delete `file_type/file_name`.
    ///
    /// Fails with [`ErrorKind::NotFound`] when the bucket does not exist, without issuing
    /// the delete.
    pub async fn remove(&self, file_type: &str, file_name: &str) -> Result<(), Error> {
        let context = format!("{file_type}/{file_name}");
        match self.delete_in_existing_bucket(file_type, file_name).await {
            Ok(()) => {
                tracing::info!("Object {file_name} successfully deleted from bucket {file_type}");
                Ok(())
            }
            Err(err) if err.is_not_found() => Err(err.with_context(context)),
            Err(err) => Err(error::io_error(context)(err)),
        }
    }

    async fn delete_in_existing_bucket(&self, bucket: &str, key: &str) -> Result<(), Error> {
        if !self.bucket_exists(bucket).await? {
            return Err(error::not_found(format!("Bucket {bucket} does not exist")));
        }
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    /// Compare the local file against the remote object. Any failure counts as "different".
    async fn matches_remote(&self, bucket: &str, key: &str, local_path: &Path) -> bool {
        let remote = match self.stat_object(bucket, key).await {
            RemoteStat::Found(stat) => stat,
            RemoteStat::NotFound => {
                tracing::warn!("Error verifying file, will download: {bucket}/{key} not found");
                return false;
            }
            RemoteStat::TransportError(err) => {
                tracing::warn!("Error verifying file, will download: {err}");
                return false;
            }
        };

        let local_size = match fs::metadata(local_path).await {
            Ok(meta) => meta.len(),
            Err(err) => {
                tracing::warn!("Error verifying file, will download: {err}");
                return false;
            }
        };

        let Some(remote_md5) = checksum_to_compare(local_size, &remote) else {
            tracing::debug!(
                local_size,
                remote_size = ?remote.size,
                e_tag = ?remote.e_tag,
                "local file differs from {bucket}/{key}"
            );
            return false;
        };

        match checksum::md5_hex(local_path).await {
            Ok(local_md5) => {
                let same = local_md5.eq_ignore_ascii_case(remote_md5);
                if !same {
                    tracing::debug!(
                        %local_md5,
                        %remote_md5,
                        "checksum differs from {bucket}/{key}"
                    );
                }
                same
            }
            Err(err) => {
                tracing::warn!("Error verifying file, will download: {err}");
                false
            }
        }
    }

    pub(crate) async fn stat_object(&self, bucket: &str, key: &str) -> RemoteStat {
        match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(output) => RemoteStat::Found(ObjectStat {
                size: output.content_length().and_then(|len| u64::try_from(len).ok()),
                e_tag: output.e_tag().map(str::to_owned),
            }),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => {
                RemoteStat::NotFound
            }
            Err(err) => RemoteStat::TransportError(err.into()),
        }
    }

    /// Download to a sibling `.part` file, then move it over `to_path`.
    ///
    /// Returns the number of bytes written.
    async fn download(&self, bucket: &str, key: &str, to_path: &Path) -> Result<u64, Error> {
        let mut output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        if let Some(parent) = to_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let part_path = part_path(to_path);
        let written = match write_body(&mut output.body, &part_path).await {
            Ok(written) => written,
            Err(err) => {
                let _ = fs::remove_file(&part_path).await;
                return Err(err);
            }
        };
        if let Err(err) = fs::rename(&part_path, to_path).await {
            let _ = fs::remove_file(&part_path).await;
            return Err(err.into());
        }
        Ok(written)
    }

    pub(crate) async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Create `bucket` unless it exists. Losing a creation race to another caller is not an error.
    async fn ensure_bucket(&self, bucket: &str) -> Result<(), Error> {
        if self.bucket_exists(bucket).await? {
            tracing::debug!("Bucket {bucket} already exists");
            return Ok(());
        }

        tracing::debug!("Making bucket {bucket}");
        let mut request = self.client.create_bucket().bucket(bucket);
        if self.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => tracing::info!("Created bucket {bucket}"),
            Err(err)
                if err.as_service_error().is_some_and(|e| {
                    e.is_bucket_already_owned_by_you() || e.is_bucket_already_exists()
                }) =>
            {
                tracing::debug!("Bucket {bucket} was created concurrently");
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }

    fn runtime(&self) -> Result<&Runtime, Error> {
        if let Some(runtime) = self.runtime.get() {
            return Ok(runtime);
        }
        // a runtime built by a thread that loses the race is dropped here, outside any runtime
        let runtime = new_runtime()?;
        Ok(self.runtime.get_or_init(|| runtime))
    }
}

impl StorageBackend for ObjectStoreBackend {
    fn get_file(&self, file_type: &str, file_name: &str, to_path: &Path) -> Result<(), Error> {
        let span = tracing::debug_span!("get_file", bucket = file_type, key = file_name);
        self.runtime()?
            .block_on(self.fetch(file_type, file_name, to_path).instrument(span))
    }

    fn put_file(&self, file_type: &str, file_name: &str, from_path: &Path) -> Result<(), Error> {
        let span = tracing::debug_span!("put_file", bucket = file_type, key = file_name);
        self.runtime()?
            .block_on(self.store(file_type, file_name, from_path).instrument(span))
    }

    fn delete_file(&self, file_type: &str, file_name: &str) -> Result<(), Error> {
        let span = tracing::debug_span!("delete_file", bucket = file_type, key = file_name);
        self.runtime()?
            .block_on(self.remove(file_type, file_name).instrument(span))
    }

    fn backend_type(&self) -> &'static str {
        "minio"
    }
}

fn new_runtime() -> Result<Runtime, Error> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Error::new(ErrorKind::RuntimeError, err))
}

/// The remote MD5 to compare the local file against, if a comparison can decide equality.
///
/// Sizes are compared first so the local file is only hashed when they agree. Multipart
/// ETags are not content digests and never match.
fn checksum_to_compare(local_size: u64, remote: &ObjectStat) -> Option<&str> {
    if remote.size != Some(local_size) {
        return None;
    }
    let e_tag = checksum::unquote(remote.e_tag.as_deref()?);
    if checksum::is_multipart(e_tag) {
        return None;
    }
    Some(e_tag)
}

fn part_path(to_path: &Path) -> PathBuf {
    let mut name = OsString::from(to_path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

async fn write_body(body: &mut ByteStream, dest: &Path) -> Result<u64, Error> {
    let mut file = fs::File::create(dest).await?;
    let mut written = 0;
    while let Some(chunk) = body.try_next().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        tracing::trace!("wrote chunk size: {}", chunk.len());
    }
    file.flush().await?;
    Ok(written)
}
