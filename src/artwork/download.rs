//! Artwork download into uniquely named temporary files.
//!
//! The body is staged in a temp file inside the target directory and then
//! renamed to `{uuid}.{ext}`, where `ext` comes from the source URL. Files
//! are never removed here; the notification sink may still read them after
//! delivery.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use reqwest::Url;
use tracing::{debug, warn};
use uuid::Uuid;

use super::fetch::{FetchError, Fetcher};

/// An artwork file written to local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub local_path: PathBuf,
    /// Extension inherited from the source URL, empty if it had none.
    pub file_extension: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("empty response body from {0}")]
    EmptyBody(Url),

    #[error("failed to write artwork to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads artwork to `{directory}/{uuid}.{ext}`.
pub struct ArtworkDownloader {
    fetcher: Arc<dyn Fetcher>,
    directory: PathBuf,
}

impl ArtworkDownloader {
    pub fn new(fetcher: Arc<dyn Fetcher>, directory: PathBuf) -> Self {
        Self { fetcher, directory }
    }

    /// Directory downloaded files are placed in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Download `url` and return the local file, or `None` on any failure.
    pub async fn download(&self, url: &Url) -> Option<PathBuf> {
        match self.try_download(url).await {
            Ok(artifact) => {
                debug!(url = %url, path = %artifact.local_path.display(), "Downloaded artwork");
                Some(artifact.local_path)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Artwork download failed");
                None
            }
        }
    }

    /// Same as [`download`](Self::download) but reports the failure cause.
    pub async fn try_download(&self, url: &Url) -> Result<DownloadedArtifact, DownloadError> {
        let body = self.fetcher.fetch(url).await?;
        if body.is_empty() {
            return Err(DownloadError::EmptyBody(url.clone()));
        }

        let file_extension = url_extension(url);
        let local_path = self.directory.join(unique_file_name(&file_extension));

        let directory = self.directory.clone();
        let target = local_path.clone();
        tokio::task::spawn_blocking(move || persist_body(&directory, &target, &body))
            .await
            .map_err(|e| DownloadError::Io {
                path: local_path.clone(),
                source: std::io::Error::other(e),
            })?
            .map_err(|source| DownloadError::Io {
                path: local_path.clone(),
                source,
            })?;

        Ok(DownloadedArtifact {
            local_path,
            file_extension,
        })
    }
}

/// Stage `body` in `directory` and rename it onto `target`.
fn persist_body(directory: &Path, target: &Path, body: &Bytes) -> std::io::Result<()> {
    let mut staged = tempfile::NamedTempFile::new_in(directory)?;
    staged.write_all(body)?;
    staged.flush()?;
    staged.persist_noclobber(target).map_err(|e| e.error)?;
    Ok(())
}

/// Extension of the last path segment of `url`, without the dot.
fn url_extension(url: &Url) -> String {
    Path::new(url.path())
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string()
}

fn unique_file_name(extension: &str) -> String {
    let token = Uuid::new_v4();
    if extension.is_empty() {
        token.to_string()
    } else {
        format!("{token}.{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticFetcher(&'static [u8]);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &Url) -> Result<Bytes, FetchError> {
            Ok(Bytes::from_static(self.0))
        }
    }

    #[test]
    fn extension_from_url_path() {
        let url = Url::parse("http://a/img.jpg").unwrap();
        assert_eq!(url_extension(&url), "jpg");

        let url = Url::parse("https://is1-ssl.mzstatic.com/image/thumb/x/100x100bb.png?x=1").unwrap();
        assert_eq!(url_extension(&url), "png");

        let url = Url::parse("http://a/artwork").unwrap();
        assert_eq!(url_extension(&url), "");
    }

    #[test]
    fn unique_names_keep_extension() {
        let a = unique_file_name("jpg");
        let b = unique_file_name("jpg");
        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
        assert!(!unique_file_name("").contains('.'));
    }

    #[tokio::test]
    async fn writes_body_to_unique_file() {
        let dir = tempfile::tempdir().unwrap();
        let downloader =
            ArtworkDownloader::new(Arc::new(StaticFetcher(b"image-bytes")), dir.path().into());

        let url = Url::parse("http://a/img.jpg").unwrap();
        let artifact = downloader.try_download(&url).await.unwrap();

        assert_eq!(artifact.file_extension, "jpg");
        assert_eq!(artifact.local_path.parent(), Some(dir.path()));
        assert_eq!(std::fs::read(&artifact.local_path).unwrap(), b"image-bytes");
        // Only the final file remains; the staging file was renamed away.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = ArtworkDownloader::new(Arc::new(StaticFetcher(b"")), dir.path().into());

        let url = Url::parse("http://a/img.jpg").unwrap();
        let err = downloader.try_download(&url).await.unwrap_err();
        assert!(matches!(err, DownloadError::EmptyBody(_)));
        assert!(downloader.download(&url).await.is_none());
    }

    #[tokio::test]
    async fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let downloader = ArtworkDownloader::new(Arc::new(StaticFetcher(b"x")), missing);

        let url = Url::parse("http://a/img.jpg").unwrap();
        let err = downloader.try_download(&url).await.unwrap_err();
        assert!(matches!(err, DownloadError::Io { .. }));
    }
}
