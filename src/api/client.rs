//! AutoBuild backend client.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

/// Default backend base URL (the development server).
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Resolve the backend base URL from the environment.
pub fn base_url() -> String {
    std::env::var("AUTOBUILD_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

/// Client for the builds backend.
pub struct BuildsClient {
    client: Client,
    base_url: String,
}

/// Request body for a build generation.
#[derive(Debug, Serialize)]
pub struct BuildRequest {
    /// Use-case description (the selected category).
    pub description: String,
    /// Minimum budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Free-text needs forwarded to the recommender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_needs: Option<String>,
}

/// A use case with its minimum viable budget.
#[derive(Debug, Clone)]
pub struct CategoryEntry {
    pub name: String,
    pub min_price: f64,
}

impl BuildsClient {
    /// Create a new backend client.
    pub fn new(base_url: &str) -> Result<Self> {
        // Generation runs a recommender server-side; give it room.
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Request a batch of builds for a budget and use case.
    ///
    /// Returns the raw payload untyped; the caller feeds it to
    /// [`crate::builds::load_collection`] so any of the historical
    /// response shapes loads.
    pub fn generate(&self, request: &BuildRequest) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}/min-price", self.base_url))
            .header("Accept", "application/json")
            .json(request)
            .send()
            .context("Failed to send build request")?;

        if !response.status().is_success() {
            anyhow::bail!("Build request failed: {}", response.status());
        }

        response.json().context("Failed to parse build response")
    }

    /// Fetch the use-case list with per-category minimum prices.
    ///
    /// The backend returns one single-entry object per category, with
    /// the minimum price as a numeric string.
    pub fn categories(&self) -> Result<Vec<CategoryEntry>> {
        let response = self
            .client
            .get(format!("{}/category", self.base_url))
            .header("Accept", "application/json")
            .send()
            .context("Failed to fetch categories")?;

        if !response.status().is_success() {
            anyhow::bail!("Category request failed: {}", response.status());
        }

        let rows: Vec<Value> = response
            .json()
            .context("Failed to parse category response")?;

        let mut entries = Vec::new();
        for row in &rows {
            let Some(map) = row.as_object() else { continue };
            for (name, value) in map {
                let min_price = match value {
                    Value::Number(n) => n.as_f64().unwrap_or(0.0),
                    Value::String(s) => s.trim().parse().unwrap_or(0.0),
                    _ => 0.0,
                };
                entries.push(CategoryEntry {
                    name: name.clone(),
                    min_price,
                });
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "requires a running backend"]
    fn test_generate() {
        let client = BuildsClient::new(&base_url()).unwrap();
        let payload = client
            .generate(&BuildRequest {
                description: "Gaming".to_string(),
                min: Some(30_000.0),
                max: Some(60_000.0),
                detailed_needs: None,
            })
            .unwrap();
        let collection = crate::builds::load_collection(&payload);
        assert!(!collection.builds.is_empty());
    }

    #[test]
    #[ignore = "requires a running backend"]
    fn test_categories() {
        let client = BuildsClient::new(&base_url()).unwrap();
        let categories = client.categories().unwrap();
        assert!(!categories.is_empty());
    }
}
