//! Download integrity verification
//!
//! A download is fetched in full, then checked against the expected size and
//! SHA-256 digest. Progress and the current phase are published on a
//! [`tokio::sync::watch`] channel so a view can follow along.
//!
//! ```text
//! Idle -> Downloading -> Verifying -> Success
//!              \              \
//!               +-> Error      +-> Error
//! ```
//!
//! There are no retries: every failure is terminal for that attempt.

pub mod source;

pub use source::{ByteStream, DownloadSource, MemoryDownloadSource};

#[cfg(feature = "download")]
pub use source::HttpDownloadSource;

use crate::core::error::IntegrityError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::watch;

/// Upper bound on the buffer reserved up front from an announced length
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Checks a download must pass; absent fields are not checked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedIntegrity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl ExpectedIntegrity {
    pub fn sha256(digest: impl Into<String>) -> Self {
        Self {
            sha256: Some(digest.into()),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_md5(mut self, digest: impl Into<String>) -> Self {
        self.md5 = Some(digest.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum VerificationStatus {
    Idle,
    /// Percentage received; stays at 0 when the size is unknown
    Downloading { progress: f64 },
    Verifying { progress: f64 },
    Success,
    Error { message: String },
}

impl VerificationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationStatus::Success | VerificationStatus::Error { .. })
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            VerificationStatus::Downloading { .. } | VerificationStatus::Verifying { .. }
        )
    }
}

/// Outcome of the individual checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub actual_size: u64,
    pub actual_sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256_match: Option<bool>,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.size_match.unwrap_or(true) && self.sha256_match.unwrap_or(true)
    }
}

/// A download that passed every check
#[derive(Debug, Clone)]
pub struct VerifiedDownload {
    pub bytes: Vec<u8>,
    pub report: VerificationReport,
}

/// Percentage received, capped at 100 when the body outruns its announced length
pub fn download_progress(received: usize, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (received as f64 / total as f64 * 100.0).min(100.0)
}

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Check `bytes` against `expected`
///
/// Size is checked first, then the digests. Digest comparison ignores case.
pub fn verify_bytes(
    bytes: &[u8],
    expected: &ExpectedIntegrity,
) -> Result<VerificationReport, IntegrityError> {
    let actual_size = bytes.len() as u64;
    let actual_sha256 = sha256_hex(bytes);

    let report = VerificationReport {
        actual_size,
        size_match: expected.size.map(|size| size == actual_size),
        sha256_match: expected
            .sha256
            .as_ref()
            .map(|digest| digest.eq_ignore_ascii_case(&actual_sha256)),
        actual_sha256,
    };

    if let (Some(expected_size), Some(false)) = (expected.size, report.size_match) {
        return Err(IntegrityError::SizeMismatch {
            expected: expected_size,
            actual: actual_size,
        });
    }

    if expected.md5.is_some() {
        return Err(IntegrityError::UnsupportedAlgorithm {
            algorithm: "MD5".to_string(),
        });
    }

    if let (Some(digest), Some(false)) = (&expected.sha256, report.sha256_match) {
        return Err(IntegrityError::ChecksumMismatch {
            algorithm: "SHA-256".to_string(),
            expected: digest.to_lowercase(),
            actual: report.actual_sha256.clone(),
        });
    }

    Ok(report)
}

/// Runs download-and-verify attempts and publishes their progress
pub struct IntegrityVerifier {
    source: Arc<dyn DownloadSource>,
    state: watch::Sender<VerificationStatus>,
}

impl IntegrityVerifier {
    pub fn new(source: Arc<dyn DownloadSource>) -> Self {
        let (state, _) = watch::channel(VerificationStatus::Idle);
        Self { source, state }
    }

    /// Follow the status of the current attempt
    pub fn subscribe(&self) -> watch::Receiver<VerificationStatus> {
        self.state.subscribe()
    }

    pub fn status(&self) -> VerificationStatus {
        self.state.borrow().clone()
    }

    /// Fetch `url` and verify it; the final status is `Success` or `Error`
    pub async fn download_and_verify(
        &self,
        url: &str,
        expected: &ExpectedIntegrity,
    ) -> Result<VerifiedDownload, IntegrityError> {
        match self.run(url, expected).await {
            Ok(download) => {
                self.state.send_replace(VerificationStatus::Success);
                tracing::info!(url, size = download.report.actual_size, "download verified");
                Ok(download)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "download verification failed");
                self.state.send_replace(VerificationStatus::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        url: &str,
        expected: &ExpectedIntegrity,
    ) -> Result<VerifiedDownload, IntegrityError> {
        self.state
            .send_replace(VerificationStatus::Downloading { progress: 0.0 });

        let mut stream = self.source.open(url).await?;
        let total = stream.content_length().filter(|&n| n > 0);
        let reserve = total.map_or(0, |n| n.min(MAX_PREALLOC));
        let mut bytes = Vec::with_capacity(usize::try_from(reserve).unwrap_or(0));

        while let Some(chunk) = stream.next_chunk().await? {
            bytes.extend_from_slice(&chunk);
            if let Some(total) = total {
                self.state.send_replace(VerificationStatus::Downloading {
                    progress: download_progress(bytes.len(), total),
                });
            }
        }

        tracing::debug!(url, received = bytes.len(), "download complete");
        self.state
            .send_replace(VerificationStatus::Verifying { progress: 0.0 });

        let report = verify_bytes(&bytes, expected)?;
        self.state
            .send_replace(VerificationStatus::Verifying { progress: 100.0 });

        Ok(VerifiedDownload { bytes, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_download_progress_is_capped() {
        assert_eq!(download_progress(0, 200), 0.0);
        assert_eq!(download_progress(50, 200), 25.0);
        assert_eq!(download_progress(200, 200), 100.0);
        assert_eq!(download_progress(500, 200), 100.0);
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(sha256_hex(b"hello"), HELLO_SHA256);
    }

    #[test]
    fn test_digest_compare_ignores_case() {
        let expected = ExpectedIntegrity::sha256(HELLO_SHA256.to_uppercase()).with_size(5);
        let report = verify_bytes(b"hello", &expected).unwrap();
        assert!(report.passed());
        assert_eq!(report.sha256_match, Some(true));
        assert_eq!(report.size_match, Some(true));
    }

    #[test]
    fn test_size_mismatch() {
        let err = verify_bytes(b"hello", &ExpectedIntegrity::default().with_size(6)).unwrap_err();
        assert!(matches!(err, IntegrityError::SizeMismatch { expected: 6, actual: 5 }));
    }

    #[test]
    fn test_md5_is_unsupported() {
        let err = verify_bytes(b"hello", &ExpectedIntegrity::default().with_md5("abc")).unwrap_err();
        assert!(matches!(err, IntegrityError::UnsupportedAlgorithm { .. }));
    }

    #[test]
    fn test_no_expectations_pass() {
        let report = verify_bytes(b"", &ExpectedIntegrity::default()).unwrap();
        assert!(report.passed());
        assert_eq!(report.actual_size, 0);
    }

    #[tokio::test]
    async fn test_status_ends_in_success() {
        let source = MemoryDownloadSource::new()
            .with_file("https://downloads.test/hello.txt", b"hello".to_vec())
            .with_chunk_size(2);
        let verifier = IntegrityVerifier::new(Arc::new(source));
        assert_eq!(verifier.status(), VerificationStatus::Idle);

        let download = verifier
            .download_and_verify(
                "https://downloads.test/hello.txt",
                &ExpectedIntegrity::sha256(HELLO_SHA256),
            )
            .await
            .unwrap();

        assert_eq!(download.bytes, b"hello");
        assert_eq!(verifier.status(), VerificationStatus::Success);
    }

    #[tokio::test]
    async fn test_network_failure_ends_in_error() {
        let verifier = IntegrityVerifier::new(Arc::new(MemoryDownloadSource::new()));
        let err = verifier
            .download_and_verify("https://downloads.test/missing", &ExpectedIntegrity::default())
            .await
            .unwrap_err();

        assert!(matches!(err, IntegrityError::Network { .. }));
        assert!(matches!(verifier.status(), VerificationStatus::Error { .. }));
        assert!(verifier.status().is_terminal());
    }
}
