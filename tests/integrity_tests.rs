//! Tests for the download-and-verify flow
//!
//! Downloads come from in-memory sources; a failing source stands in for a
//! connection dropped mid-transfer.

use async_trait::async_trait;
use opensoftware::core::error::IntegrityError;
use opensoftware::integrity::{
    ByteStream, DownloadSource, ExpectedIntegrity, IntegrityVerifier, MemoryDownloadSource,
    VerificationStatus, sha256_hex,
};
use std::sync::Arc;

const INSTALLER_URL: &str = "https://downloads.example.org/winrar-x64.exe";

fn installer() -> Vec<u8> {
    (0..50_000u32).map(|i| (i % 251) as u8).collect()
}

fn verifier() -> IntegrityVerifier {
    let source = MemoryDownloadSource::new()
        .with_file(INSTALLER_URL, installer())
        .with_chunk_size(4096);
    IntegrityVerifier::new(Arc::new(source))
}

/// Yields one chunk, then fails
struct DroppedConnection;

struct DroppedStream {
    sent: bool,
}

#[async_trait]
impl DownloadSource for DroppedConnection {
    async fn open(&self, _url: &str) -> Result<Box<dyn ByteStream>, IntegrityError> {
        Ok(Box::new(DroppedStream { sent: false }))
    }
}

#[async_trait]
impl ByteStream for DroppedStream {
    fn content_length(&self) -> Option<u64> {
        Some(1024)
    }

    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, IntegrityError> {
        if self.sent {
            return Err(IntegrityError::Network {
                message: "connection reset by peer".to_string(),
            });
        }
        self.sent = true;
        Ok(Some(vec![0; 512]))
    }
}

/// Serves `b"hello"` while announcing an arbitrary length
struct MisreportedLength(u64);

struct MisreportedStream {
    announced: u64,
    sent: bool,
}

#[async_trait]
impl DownloadSource for MisreportedLength {
    async fn open(&self, _url: &str) -> Result<Box<dyn ByteStream>, IntegrityError> {
        Ok(Box::new(MisreportedStream {
            announced: self.0,
            sent: false,
        }))
    }
}

#[async_trait]
impl ByteStream for MisreportedStream {
    fn content_length(&self) -> Option<u64> {
        Some(self.announced)
    }

    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, IntegrityError> {
        if self.sent {
            return Ok(None);
        }
        self.sent = true;
        Ok(Some(b"hello".to_vec()))
    }
}

// =============================================================================
// Successful verification
// =============================================================================

mod success_tests {
    use super::*;

    #[tokio::test]
    async fn test_matching_download_succeeds() {
        let verifier = verifier();
        assert_eq!(verifier.status(), VerificationStatus::Idle);

        let expected = ExpectedIntegrity::sha256(sha256_hex(&installer())).with_size(50_000);
        let download = verifier
            .download_and_verify(INSTALLER_URL, &expected)
            .await
            .unwrap();

        assert_eq!(download.bytes, installer());
        assert!(download.report.passed());
        assert_eq!(download.report.actual_size, 50_000);
        assert_eq!(verifier.status(), VerificationStatus::Success);
    }

    #[tokio::test]
    async fn test_without_length_still_verifies() {
        let source = MemoryDownloadSource::new()
            .with_file(INSTALLER_URL, installer())
            .without_length();
        let verifier = IntegrityVerifier::new(Arc::new(source));

        let expected = ExpectedIntegrity::sha256(sha256_hex(&installer()));
        assert!(verifier.download_and_verify(INSTALLER_URL, &expected).await.is_ok());
    }

    #[tokio::test]
    async fn test_huge_announced_length_does_not_preallocate() {
        let verifier = IntegrityVerifier::new(Arc::new(MisreportedLength(u64::MAX)));

        let expected = ExpectedIntegrity::sha256(sha256_hex(b"hello")).with_size(5);
        let download = verifier
            .download_and_verify(INSTALLER_URL, &expected)
            .await
            .unwrap();

        assert_eq!(download.bytes, b"hello");
        assert_eq!(verifier.status(), VerificationStatus::Success);
    }

    #[tokio::test]
    async fn test_body_longer_than_announced_still_verifies() {
        let verifier = IntegrityVerifier::new(Arc::new(MisreportedLength(2)));
        let mut updates = verifier.subscribe();

        let expected = ExpectedIntegrity::sha256(sha256_hex(b"hello"));
        verifier
            .download_and_verify(INSTALLER_URL, &expected)
            .await
            .unwrap();

        assert_eq!(*updates.borrow_and_update(), VerificationStatus::Success);
    }

    #[tokio::test]
    async fn test_subscribers_see_the_final_state() {
        let verifier = verifier();
        let mut updates = verifier.subscribe();

        let expected = ExpectedIntegrity::default();
        verifier
            .download_and_verify(INSTALLER_URL, &expected)
            .await
            .unwrap();

        assert!(updates.has_changed().unwrap());
        let status = updates.borrow_and_update().clone();
        assert!(status.is_terminal());
        assert!(!status.is_busy());
    }
}

// =============================================================================
// Failures
// =============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_checksum_mismatch_ends_in_error() {
        let verifier = verifier();
        let expected = ExpectedIntegrity::sha256(sha256_hex(b"something else"));

        let err = verifier
            .download_and_verify(INSTALLER_URL, &expected)
            .await
            .unwrap_err();

        assert!(matches!(err, IntegrityError::ChecksumMismatch { .. }));
        assert!(matches!(verifier.status(), VerificationStatus::Error { .. }));
    }

    #[tokio::test]
    async fn test_size_mismatch_ends_in_error() {
        let verifier = verifier();
        let expected = ExpectedIntegrity::sha256(sha256_hex(&installer())).with_size(1);

        let err = verifier
            .download_and_verify(INSTALLER_URL, &expected)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::SizeMismatch {
                expected: 1,
                actual: 50_000
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_url_is_a_network_error() {
        let verifier = verifier();

        let err = verifier
            .download_and_verify("https://downloads.example.org/missing.exe", &ExpectedIntegrity::default())
            .await
            .unwrap_err();

        assert!(matches!(err, IntegrityError::Network { .. }));
        assert_eq!(err.error_code(), "DOWNLOAD_FAILED");
        assert!(matches!(verifier.status(), VerificationStatus::Error { .. }));
    }

    #[tokio::test]
    async fn test_dropped_connection_is_terminal() {
        let verifier = IntegrityVerifier::new(Arc::new(DroppedConnection));

        let err = verifier
            .download_and_verify(INSTALLER_URL, &ExpectedIntegrity::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection reset by peer"));
        match verifier.status() {
            VerificationStatus::Error { message } => {
                assert!(message.contains("connection reset by peer"))
            }
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_md5_expectation_fails() {
        let verifier = verifier();
        let expected = ExpectedIntegrity::default().with_md5("d41d8cd98f00b204e9800998ecf8427e");

        let err = verifier
            .download_and_verify(INSTALLER_URL, &expected)
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrityError::UnsupportedAlgorithm { .. }));
    }
}
