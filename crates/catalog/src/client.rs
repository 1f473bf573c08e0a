//! HTTP client for the catalog API.

use std::time::Duration;

use pizzeria_core::Category;

use crate::envelope::decode_items;
use crate::item::{Catalog, CatalogItem};

/// Client for the read-only catalog endpoints (`/pizzas`, `/toppings`,
/// `/beverages`).
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, category: Category) -> String {
        format!("{}/{}", self.base_url, category.collection())
    }

    /// Fetch one category, surfacing every failure.
    pub async fn fetch(&self, category: Category) -> Result<Vec<CatalogItem>, CatalogError> {
        let url = self.endpoint(category);
        tracing::debug!(%category, %url, "fetching catalog");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Api(
                status.as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        decode_items(category, &body)
    }

    /// Fetch one category; any failure degrades to no items.
    pub async fn fetch_or_empty(&self, category: Category) -> Vec<CatalogItem> {
        match self.fetch(category).await {
            Ok(items) => {
                tracing::info!(%category, count = items.len(), "catalog loaded");
                items
            }
            Err(err) => {
                tracing::warn!(%category, error = %err, "catalog unavailable; no items");
                Vec::new()
            }
        }
    }

    /// Fetch all categories concurrently.
    pub async fn fetch_catalog(&self) -> Catalog {
        let (pizzas, toppings, beverages) = tokio::join!(
            self.fetch_or_empty(Category::Pizza),
            self.fetch_or_empty(Category::Topping),
            self.fetch_or_empty(Category::Beverage),
        );

        Catalog::new()
            .with_items(Category::Pizza, pizzas)
            .with_items(Category::Topping, toppings)
            .with_items(Category::Beverage, beverages)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("http client setup failed: {0}")]
    Client(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}
