//! Loading of bundled static files.
//!
//! The page ships its shelter data as a static file next to the page
//! itself. [`AssetSource`] abstracts where that file comes from: the local
//! filesystem when serving it ([`FileAssets`]) or an HTTP origin when
//! consuming a deployed page ([`HttpAssets`]).

use std::path::{Component, Path, PathBuf};

use crate::DataError;

/// A source of bundled static files addressed by relative identifiers
/// such as `./tilfluktsrom.geojson`.
#[async_trait::async_trait]
pub trait AssetSource: Send + Sync {
    /// Loads the asset at `path` as text.
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] if the asset cannot be retrieved.
    async fn load(&self, path: &str) -> Result<String, DataError>;
}

/// Assets read from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileAssets {
    root: PathBuf,
}

impl FileAssets {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative asset identifier below the root directory.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Asset`] for absolute paths and paths that
    /// escape the root with `..`.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, DataError> {
        let mut resolved = self.root.clone();

        for component in Path::new(path).components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => resolved.push(part),
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(DataError::Asset {
                        message: format!("Asset path '{path}' is outside the asset root"),
                    });
                }
            }
        }

        Ok(resolved)
    }
}

#[async_trait::async_trait]
impl AssetSource for FileAssets {
    async fn load(&self, path: &str) -> Result<String, DataError> {
        let file = self.resolve(path)?;
        log::debug!("Reading asset {}", file.display());
        Ok(tokio::fs::read_to_string(&file).await?)
    }
}

/// Assets fetched over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpAssets {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAssets {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Joins a relative asset identifier onto the base URL.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches("./").trim_start_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl AssetSource for HttpAssets {
    async fn load(&self, path: &str) -> Result<String, DataError> {
        let url = self.url_for(path);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(DataError::Asset {
                message: format!("Request for {url} failed with status {}", resp.status()),
            });
        }
        Ok(resp.text().await?)
    }
}
