//! [`DatasetSource`] implementations.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{DatasetSource, LoadError};

/// Reads `http://`/`https://` locators over the network and everything
/// else from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
    client: reqwest::Client,
}

impl DefaultSource {
    /// Creates a source with a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source that reuses an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

#[async_trait]
impl DatasetSource for DefaultSource {
    async fn fetch(&self, locator: &str) -> Result<String, LoadError> {
        if is_remote(locator) {
            let response = self.client.get(locator).send().await?.error_for_status()?;
            Ok(response.text().await?)
        } else {
            match tokio::fs::read_to_string(locator).await {
                Ok(text) => Ok(text),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(LoadError::NotFound {
                    locator: locator.to_owned(),
                }),
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// Serves documents from memory, keyed by locator.
///
/// Handy for tests and for embedding small fixed datasets.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: BTreeMap<String, String>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document served at `locator`.
    #[must_use]
    pub fn with_document(mut self, locator: &str, text: &str) -> Self {
        self.documents.insert(locator.to_owned(), text.to_owned());
        self
    }
}

#[async_trait]
impl DatasetSource for MemorySource {
    async fn fetch(&self, locator: &str) -> Result<String, LoadError> {
        self.documents
            .get(locator)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                locator: locator.to_owned(),
            })
    }
}
