/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::ProvideErrorMetadata;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: The `Display` implementation includes the message of the immediate cause. Use
/// [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display the entire
/// error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    context: Option<String>,
    message: Option<String>,
    source: BoxError,
}

/// General categories of storage errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The bucket or object does not exist
    NotFound,

    /// Transport, read, or write failure
    IOError,

    /// Unrecognized storage type or otherwise unusable configuration
    InvalidConfiguration,

    /// The internal async runtime could not be started
    RuntimeError,
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            context: None,
            message: None,
            source: err.into(),
        }
    }

    /// Attach a description of what was being accessed, e.g. `bucket/key`.
    pub(crate) fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns what was being accessed when the error occurred, if known.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns true if this is a [`ErrorKind::NotFound`] error.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::NotFound => write!(f, "resource not found")?,
            ErrorKind::IOError => write!(f, "I/O error")?,
            ErrorKind::InvalidConfiguration => write!(f, "invalid configuration")?,
            ErrorKind::RuntimeError => write!(f, "runtime error")?,
        }
        if let Some(context) = &self.context {
            write!(f, " ({context})")?;
        }
        match &self.message {
            Some(message) => write!(f, ": {message}"),
            None => write!(f, ": {}", self.source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

impl From<aws_smithy_types::byte_stream::error::Error> for Error {
    fn from(value: aws_smithy_types::byte_stream::error::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    fn from(value: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        let kind = match value.code() {
            Some("NotFound" | "NoSuchKey" | "NoSuchBucket") => ErrorKind::NotFound,
            _ => ErrorKind::IOError,
        };
        // `SdkError`'s own Display is only e.g. "service error"
        let message = match (value.code(), value.message()) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(code), None) => code.to_owned(),
            (None, Some(message)) => message.to_owned(),
            (None, None) => display_chain(&value),
        };

        Error {
            message: Some(message),
            ..Error::new(kind, value)
        }
    }
}

/// Messages of `err` and all of its sources, joined by `": "`.
fn display_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

pub(crate) fn not_found<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::NotFound, err)
}

pub(crate) fn invalid_configuration<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InvalidConfiguration, err)
}

/// Turn any failure into an [`ErrorKind::IOError`] tagged with `context`.
///
/// The original kind is discarded, the cause and its message are kept. An [`Error`] is
/// re-tagged rather than nested.
pub(crate) fn io_error<E>(context: impl Into<String>) -> impl FnOnce(E) -> Error
where
    E: Into<Error>,
{
    let context = context.into();
    move |err| {
        let mut err = err.into();
        err.kind = ErrorKind::IOError;
        err.with_context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::http::HttpResponse;
    use aws_sdk_s3::operation::head_bucket::HeadBucketError;
    use aws_sdk_s3::types::error::NotFound;
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;
    use aws_smithy_types::error::ErrorMetadata;

    #[test]
    fn test_display_includes_context_and_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let err = io_error::<std::io::Error>("docs/a.txt")(cause);
        assert_eq!(ErrorKind::IOError, *err.kind());
        assert_eq!(Some("docs/a.txt"), err.context());
        assert_eq!("I/O error (docs/a.txt): connection reset", err.to_string());
    }

    #[test]
    fn test_io_error_discards_original_kind() {
        let err = io_error::<Error>("docs/a.txt")(not_found("gone"));
        assert!(!err.is_not_found());
        assert_eq!("I/O error (docs/a.txt): gone", err.to_string());
    }

    #[test]
    fn test_sdk_error_codes_map_to_kinds() {
        let not_found = aws_sdk_s3::error::SdkError::service_error(
            HeadBucketError::NotFound(
                NotFound::builder()
                    .meta(ErrorMetadata::builder().code("NotFound").build())
                    .build(),
            ),
            HttpResponse::new(StatusCode::try_from(404).unwrap(), SdkBody::empty()),
        );
        assert!(Error::from(not_found).is_not_found());

        let throttled = aws_sdk_s3::error::SdkError::service_error(
            HeadBucketError::generic(ErrorMetadata::builder().code("SlowDown").build()),
            HttpResponse::new(StatusCode::try_from(503).unwrap(), SdkBody::empty()),
        );
        assert_eq!(ErrorKind::IOError, *Error::from(throttled).kind());
    }

    #[test]
    fn test_sdk_error_message_keeps_code_and_message() {
        let denied = aws_sdk_s3::error::SdkError::service_error(
            HeadBucketError::generic(
                ErrorMetadata::builder()
                    .code("AccessDenied")
                    .message("Access Denied")
                    .build(),
            ),
            HttpResponse::new(StatusCode::try_from(403).unwrap(), SdkBody::empty()),
        );
        let err = io_error::<aws_sdk_s3::error::SdkError<HeadBucketError, HttpResponse>>(
            "docs/a.txt",
        )(denied);

        assert_eq!(ErrorKind::IOError, *err.kind());
        assert_eq!(
            "I/O error (docs/a.txt): AccessDenied: Access Denied",
            err.to_string()
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_sdk_error_without_metadata_shows_cause_chain() {
        let timeout = aws_sdk_s3::error::SdkError::<HeadBucketError, HttpResponse>::timeout_error(
            "read timed out",
        );
        let err = Error::from(timeout);
        assert_eq!(ErrorKind::IOError, *err.kind());
        assert!(err.to_string().contains("read timed out"));
    }
}
