//! Animal service client
//!
//! Maps the three endpoints of the animal service onto typed calls made
//! through the [`ResilientTransport`].

use super::models::AnimalPage;
use super::transport::{ResilientTransport, RetryPolicy};
use crate::config::{FaunaConfig, MAX_BATCH_SIZE};
use crate::domain::{AnimalId, CanonicalRecord, FaunaError, RawRecord, Result, TransportError};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use url::Url;

const LISTING_PATH: &str = "animals/v1/animals";
const HOME_PATH: &str = "animals/v1/home";

/// Client for the animal service
pub struct AnimalApiClient {
    base_url: String,
    listing: Url,
    home: Url,
    per_page: Option<u32>,
    transport: ResilientTransport,
}

impl AnimalApiClient {
    /// Create a client from configuration
    ///
    /// Retry waits are aborted once `shutdown` turns true.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fauna::adapters::animals::AnimalApiClient;
    /// use fauna::config::FaunaConfig;
    ///
    /// # async fn example() -> fauna::domain::Result<()> {
    /// let (_tx, rx) = tokio::sync::watch::channel(false);
    /// let client = AnimalApiClient::new(&FaunaConfig::default(), rx)?;
    /// client.health_check().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &FaunaConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let transport =
            ResilientTransport::new(&config.source, RetryPolicy::from_config(&config.retry))?
                .with_shutdown(shutdown);

        Self::with_transport(&config.source.base_url, config.source.per_page, transport)
    }

    /// Create a client around an existing transport
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn with_transport(
        base_url: &str,
        per_page: Option<u32>,
        transport: ResilientTransport,
    ) -> Result<Self> {
        let mut root = Url::parse(base_url).map_err(|e| {
            FaunaError::Configuration(format!("Invalid animal service URL '{base_url}': {e}"))
        })?;

        // Keep any path prefix when joining endpoint paths
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }

        let join = |path: &str| {
            root.join(path).map_err(|e| {
                FaunaError::Configuration(format!("Invalid endpoint path '{path}': {e}"))
            })
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            listing: join(LISTING_PATH)?,
            home: join(HOME_PATH)?,
            per_page,
            transport,
        })
    }

    /// Base URL of the animal service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one listing page
    pub fn listing_url(&self, page: u32) -> String {
        let mut url = self.listing.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            if let Some(per_page) = self.per_page {
                query.append_pair("per_page", &per_page.to_string());
            }
        }
        url.to_string()
    }

    /// URL of one animal's detail
    pub fn detail_url(&self, id: AnimalId) -> String {
        format!("{}/{}", self.listing.as_str().trim_end_matches('/'), id)
    }

    /// URL of the destination endpoint
    pub fn home_url(&self) -> &str {
        self.home.as_str()
    }

    /// Fetch one listing page
    pub async fn list_animals(&self, page: u32) -> std::result::Result<AnimalPage, TransportError> {
        let url = self.listing_url(page);
        let value = self.transport.execute(Method::GET, &url, None).await?;
        decode("GET", &url, value)
    }

    /// Fetch one animal's full record
    pub async fn get_animal(&self, id: AnimalId) -> std::result::Result<RawRecord, TransportError> {
        let url = self.detail_url(id);
        let value = self.transport.execute(Method::GET, &url, None).await?;
        decode("GET", &url, value)
    }

    /// POST a batch of animals to the destination
    ///
    /// # Errors
    ///
    /// Returns an error if the batch holds more than [`MAX_BATCH_SIZE`]
    /// records or the request fails after retries.
    pub async fn load_animals(&self, animals: &[CanonicalRecord]) -> Result<Value> {
        if animals.len() > MAX_BATCH_SIZE {
            return Err(FaunaError::Other(format!(
                "Cannot load {} animals in one request, the limit is {MAX_BATCH_SIZE}",
                animals.len()
            )));
        }

        let body = serde_json::to_value(animals)?;
        let response = self
            .transport
            .execute(Method::POST, self.home.as_str(), Some(&body))
            .await?;

        Ok(response)
    }

    /// Verify the service is reachable by fetching the first listing page
    ///
    /// # Errors
    ///
    /// Returns the transport error if the service does not answer.
    pub async fn health_check(&self) -> Result<()> {
        match self.list_animals(1).await {
            Ok(page) => {
                tracing::info!(
                    base_url = %self.base_url,
                    total_pages = ?page.total_pages,
                    "Animal service health check passed"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    base_url = %self.base_url,
                    error = %e,
                    "Animal service health check failed"
                );
                Err(e.into())
            }
        }
    }
}

fn decode<T: DeserializeOwned>(
    method: &str,
    url: &str,
    value: Value,
) -> std::result::Result<T, TransportError> {
    serde_json::from_value(value).map_err(|e| TransportError::InvalidResponse {
        method: method.to_string(),
        url: url.to_string(),
        message: format!("Unexpected response shape: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    fn client(base_url: &str, per_page: Option<u32>) -> AnimalApiClient {
        let transport = ResilientTransport::with_client(Client::new(), RetryPolicy::default());
        AnimalApiClient::with_transport(base_url, per_page, transport).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client("http://localhost:3123", None);
        assert_eq!(client.base_url(), "http://localhost:3123");
        assert_eq!(
            client.listing_url(1),
            "http://localhost:3123/animals/v1/animals?page=1"
        );
        assert_eq!(
            client.detail_url(AnimalId::new(42)),
            "http://localhost:3123/animals/v1/animals/42"
        );
        assert_eq!(client.home_url(), "http://localhost:3123/animals/v1/home");
    }

    #[test]
    fn test_listing_url_with_page_size() {
        let client = client("http://localhost:3123/", Some(25));
        assert_eq!(
            client.listing_url(3),
            "http://localhost:3123/animals/v1/animals?page=3&per_page=25"
        );
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let client = client("http://gateway.local/zoo", None);
        assert_eq!(
            client.home_url(),
            "http://gateway.local/zoo/animals/v1/home"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let transport = ResilientTransport::with_client(Client::new(), RetryPolicy::default());
        let result = AnimalApiClient::with_transport("not a url", None, transport);
        assert!(matches!(result, Err(FaunaError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_oversized_batch_is_rejected_locally() {
        let client = client("http://127.0.0.1:9", None);
        let animals: Vec<CanonicalRecord> = (0..=MAX_BATCH_SIZE as u64)
            .map(|id| CanonicalRecord::builder().id(id).name("x").build().unwrap())
            .collect();

        let err = client.load_animals(&animals).await.unwrap_err();
        assert!(err.to_string().contains("limit is 100"));
    }
}
