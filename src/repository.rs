// src/repository.rs

//! Index sources
//!
//! Retrieval of raw APKINDEX bytes, either from a remote repository
//! (HTTP GET of `<url>/APKINDEX.tar.gz` plus gzip tar extraction) or from
//! a local fixture file for deterministic testing.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tar::Archive;
use tracing::{debug, info};
use url::Url;

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Name of the archive member holding the package index
const INDEX_MEMBER: &str = "APKINDEX";

/// A capability that produces one snapshot of raw index bytes.
///
/// Implementations perform no caching: every call is a fresh fetch.
pub trait IndexSource {
    fn fetch_raw_index(&self) -> Result<Vec<u8>>;
}

/// Fetches the index from a remote repository over HTTP
pub struct RemoteSource {
    base_url: Url,
    client: Client,
}

impl RemoteSource {
    /// Create a source for the given repository URL with the default timeout
    pub fn new(repository_url: &str) -> Result<Self> {
        Self::with_timeout(repository_url, HTTP_TIMEOUT)
    }

    /// Create a source with a custom transport timeout
    pub fn with_timeout(repository_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(repository_url).map_err(|e| {
            Error::NetworkError(format!("Invalid repository URL '{repository_url}': {e}"))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    fn index_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/APKINDEX.tar.gz")
    }
}

impl IndexSource for RemoteSource {
    /// One network round trip and one decompression pass per call.
    ///
    /// Failures surface immediately; retry policy belongs to the caller.
    fn fetch_raw_index(&self) -> Result<Vec<u8>> {
        let url = self.index_url();
        info!("Fetching package index from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::NetworkError(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::NetworkError(format!(
                "Failed to fetch {url}: HTTP {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| Error::NetworkError(format!("Failed to read response from {url}: {e}")))?;

        debug!("Downloaded {} bytes from {}", body.len(), url);
        extract_index_member(&body)
    }
}

/// Reads raw index bytes verbatim from a local file
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IndexSource for LocalFileSource {
    fn fetch_raw_index(&self) -> Result<Vec<u8>> {
        debug!("Reading package index from {}", self.path.display());
        fs::read(&self.path)
            .map_err(|e| Error::IoError(format!("Failed to read {}: {e}", self.path.display())))
    }
}

/// Extract the `APKINDEX` member from a gzip-compressed tar archive
fn extract_index_member(data: &[u8]) -> Result<Vec<u8>> {
    let mut archive = Archive::new(GzDecoder::new(data));

    let entries = archive
        .entries()
        .map_err(|e| Error::FormatError(format!("Not a valid gzip archive: {e}")))?;

    for entry in entries {
        // Decompression errors surface lazily while iterating entries
        let mut entry =
            entry.map_err(|e| Error::FormatError(format!("Malformed index archive: {e}")))?;

        let path = entry
            .path()
            .map_err(|e| Error::FormatError(format!("Malformed index archive: {e}")))?
            .to_string_lossy()
            .to_string();

        if path == INDEX_MEMBER {
            let mut content = Vec::new();
            entry.read_to_end(&mut content).map_err(|e| {
                Error::FormatError(format!("Failed to read {INDEX_MEMBER} member: {e}"))
            })?;
            return Ok(content);
        }
    }

    Err(Error::FormatError(format!(
        "Index archive has no {INDEX_MEMBER} member"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    /// Build a gzip-compressed tar archive with the given members
    fn build_archive(members: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());

        for (name, content) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }

        builder.finish().unwrap();
        let tar_bytes = builder.into_inner().unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_extract_index_member() {
        let archive = build_archive(&[
            ("DESCRIPTION", "ignored"),
            ("APKINDEX", "P:app\nV:1.0\nD:libA\n"),
        ]);

        let bytes = extract_index_member(&archive).unwrap();
        assert_eq!(bytes, b"P:app\nV:1.0\nD:libA\n");
    }

    #[test]
    fn test_missing_index_member_is_format_error() {
        let archive = build_archive(&[("DESCRIPTION", "no index here")]);

        let result = extract_index_member(&archive);
        assert!(matches!(result, Err(Error::FormatError(_))));
    }

    #[test]
    fn test_not_gzip_is_format_error() {
        let result = extract_index_member(b"definitely not a gzip archive");
        assert!(matches!(result, Err(Error::FormatError(_))));
    }

    #[test]
    fn test_local_file_source_reads_verbatim() {
        let mut fixture = tempfile::NamedTempFile::new().unwrap();
        fixture.write_all(b"P:app\nV:1.0\n").unwrap();

        let source = LocalFileSource::new(fixture.path());
        let bytes = source.fetch_raw_index().unwrap();
        assert_eq!(bytes, b"P:app\nV:1.0\n");
    }

    #[test]
    fn test_local_file_source_missing_file_is_io_error() {
        let source = LocalFileSource::new("/nonexistent/APKINDEX");
        let result = source.fetch_raw_index();
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn test_index_url_construction() {
        let source = RemoteSource::new("https://dl-cdn.alpinelinux.org/alpine/v3.20/main").unwrap();
        assert_eq!(
            source.index_url(),
            "https://dl-cdn.alpinelinux.org/alpine/v3.20/main/APKINDEX.tar.gz"
        );

        // Trailing slash does not produce a double slash
        let source = RemoteSource::new("https://example.com/repo/").unwrap();
        assert_eq!(source.index_url(), "https://example.com/repo/APKINDEX.tar.gz");
    }

    #[test]
    fn test_invalid_url_is_network_error() {
        let result = RemoteSource::new("not a url");
        assert!(matches!(result, Err(Error::NetworkError(_))));
    }
}
