//! Byte sources for the download-and-verify flow

use crate::core::error::IntegrityError;
use async_trait::async_trait;
use std::collections::HashMap;

/// An opened download, read chunk by chunk
#[async_trait]
pub trait ByteStream: Send {
    /// Total size announced by the source, if any
    fn content_length(&self) -> Option<u64>;

    /// Next chunk, or `None` once the body is exhausted
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, IntegrityError>;
}

/// Something that can open a URL for reading
#[async_trait]
pub trait DownloadSource: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn ByteStream>, IntegrityError>;
}

/// Serves fixed payloads from memory in fixed-size chunks
///
/// Unknown URLs fail like an unreachable host.
#[derive(Debug, Clone)]
pub struct MemoryDownloadSource {
    files: HashMap<String, Vec<u8>>,
    chunk_size: usize,
    announce_length: bool,
}

impl MemoryDownloadSource {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            chunk_size: 8 * 1024,
            announce_length: true,
        }
    }

    pub fn with_file(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(url.into(), bytes.into());
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Omit the content length, as a chunked response would
    pub fn without_length(mut self) -> Self {
        self.announce_length = false;
        self
    }
}

impl Default for MemoryDownloadSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DownloadSource for MemoryDownloadSource {
    async fn open(&self, url: &str) -> Result<Box<dyn ByteStream>, IntegrityError> {
        let bytes = self
            .files
            .get(url)
            .cloned()
            .ok_or_else(|| IntegrityError::Network {
                message: format!("Download failed: 404 Not Found ({})", url),
            })?;

        Ok(Box::new(MemoryByteStream {
            length: self.announce_length.then_some(bytes.len() as u64),
            bytes,
            offset: 0,
            chunk_size: self.chunk_size,
        }))
    }
}

struct MemoryByteStream {
    bytes: Vec<u8>,
    offset: usize,
    chunk_size: usize,
    length: Option<u64>,
}

#[async_trait]
impl ByteStream for MemoryByteStream {
    fn content_length(&self) -> Option<u64> {
        self.length
    }

    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, IntegrityError> {
        if self.offset >= self.bytes.len() {
            return Ok(None);
        }
        let end = (self.offset + self.chunk_size).min(self.bytes.len());
        let chunk = self.bytes[self.offset..end].to_vec();
        self.offset = end;
        Ok(Some(chunk))
    }
}

#[cfg(feature = "download")]
pub use http::HttpDownloadSource;

#[cfg(feature = "download")]
mod http {
    use super::{ByteStream, DownloadSource};
    use crate::core::error::IntegrityError;
    use async_trait::async_trait;

    /// Downloads over HTTP(S) with reqwest
    #[derive(Debug, Clone, Default)]
    pub struct HttpDownloadSource {
        client: reqwest::Client,
    }

    impl HttpDownloadSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl DownloadSource for HttpDownloadSource {
        async fn open(&self, url: &str) -> Result<Box<dyn ByteStream>, IntegrityError> {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| IntegrityError::Network {
                    message: e.to_string(),
                })?;

            if !response.status().is_success() {
                return Err(IntegrityError::Network {
                    message: format!("Download failed: {}", response.status()),
                });
            }

            Ok(Box::new(HttpByteStream { response }))
        }
    }

    struct HttpByteStream {
        response: reqwest::Response,
    }

    #[async_trait]
    impl ByteStream for HttpByteStream {
        fn content_length(&self) -> Option<u64> {
            self.response.content_length()
        }

        async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, IntegrityError> {
            self.response
                .chunk()
                .await
                .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                .map_err(|e| IntegrityError::Network {
                    message: e.to_string(),
                })
        }
    }
}
