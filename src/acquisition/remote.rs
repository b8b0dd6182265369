//! Remote dataset download into a local cache file

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};
use tracing::info;

use super::AcquisitionError;

/// Placeholder replaced by the resource identifier in URL templates
pub const ID_PLACEHOLDER: &str = "{id}";

// RFC 3986 unreserved characters pass through, everything else is escaped
const IDENTIFIER: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub struct RemoteFetcher {
    client: reqwest::Client,
    url_template: String,
    cache_file: PathBuf,
}

impl RemoteFetcher {
    pub fn new(url_template: &str, cache_file: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url_template: url_template.to_string(),
            cache_file: cache_file.into(),
        }
    }

    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    pub fn resolve_url(&self, id: &str) -> String {
        let encoded = utf8_percent_encode(id, IDENTIFIER).to_string();
        self.url_template.replace(ID_PLACEHOLDER, &encoded)
    }

    /// Download the resource and store it at the cache file path
    pub async fn download(&self, id: &str) -> Result<PathBuf, AcquisitionError> {
        let url = self.resolve_url(id);
        info!("Downloading dataset '{}' from {}", id, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| AcquisitionError::Network {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(AcquisitionError::HttpStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| AcquisitionError::Network {
                url: url.clone(),
                source,
            })?;

        if let Some(parent) = self.cache_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AcquisitionError::io(parent, e))?;
        }
        tokio::fs::write(&self.cache_file, &body)
            .await
            .map_err(|e| AcquisitionError::io(&self.cache_file, e))?;

        info!("Stored {} bytes at {:?}", body.len(), self.cache_file);
        Ok(self.cache_file.clone())
    }
}
