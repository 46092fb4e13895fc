//! Remote food-catalog lookups
//!
//! The catalog is slow and unreliable from the core's point of view. Every
//! call made through [`CatalogLookup`] is wrapped in a timeout by the caller,
//! and every failure degrades to "no result".

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::core::config::LookupConfig;

/// Errors from a remote lookup
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Lookup request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Lookup service returned status {0}")]
    Status(u16),

    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Free-text and barcode search against a food catalog
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Category tags of the first product matching `name`
    async fn search_tags(&self, name: &str) -> Result<Option<Vec<String>>, LookupError>;

    /// Display name of the product with the given barcode
    async fn product_name(&self, barcode: &str) -> Result<Option<String>, LookupError>;
}

/// Offline lookup that never finds anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLookup;

#[async_trait]
impl CatalogLookup for NoLookup {
    async fn search_tags(&self, _name: &str) -> Result<Option<Vec<String>>, LookupError> {
        Ok(None)
    }

    async fn product_name(&self, _barcode: &str) -> Result<Option<String>, LookupError> {
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<SearchProduct>,
}

#[derive(Debug, Deserialize)]
struct SearchProduct {
    #[serde(default)]
    categories_tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    product: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Open Food Facts HTTP client
pub struct OpenFoodFacts {
    search_url: String,
    product_url: String,
    language: String,
    http_client: Client,
}

impl OpenFoodFacts {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("larder/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            search_url: config.search_url.clone(),
            product_url: config.product_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            http_client,
        })
    }

    /// Field names tried in order when naming a scanned product
    fn name_fields(&self) -> Vec<String> {
        vec![
            format!("product_name_{}", self.language),
            "product_name".to_string(),
            format!("generic_name_{}", self.language),
            "generic_name".to_string(),
            "product_name_en".to_string(),
        ]
    }
}

#[async_trait]
impl CatalogLookup for OpenFoodFacts {
    async fn search_tags(&self, name: &str) -> Result<Option<Vec<String>>, LookupError> {
        debug!(name, "Searching catalog");
        let response = self
            .http_client
            .get(&self.search_url)
            .query(&[
                ("search_terms", name),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.products.into_iter().next().map(|p| p.categories_tags))
    }

    async fn product_name(&self, barcode: &str) -> Result<Option<String>, LookupError> {
        let url = format!("{}/{}.json", self.product_url, barcode.trim());
        debug!(%url, "Fetching product by barcode");
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: ProductResponse = response.json().await?;
        if body.status != 1 {
            return Ok(None);
        }
        let Some(product) = body.product else {
            return Ok(None);
        };

        Ok(self.name_fields().iter().find_map(|field| {
            product
                .get(field)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }))
    }
}
