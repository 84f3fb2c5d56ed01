//! Favorites API client.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

/// External favorites store.
///
/// The remote API owns the durable per-user favorites; this seam keeps
/// the sync logic independent of the HTTP transport.
pub trait FavoritesRemote {
    /// All favorite rows for a user, as raw payloads.
    fn list(&self, user_id: i64) -> Result<Vec<Value>>;

    /// Create a favorite from a serialized build snapshot; returns the
    /// remote row id when the API reports one.
    fn create(&self, user_id: i64, build_data: &str) -> Result<Option<i64>>;

    /// Delete a favorite row.
    fn delete(&self, user_id: i64, favorite_id: i64) -> Result<()>;
}

/// Blocking HTTP implementation of [`FavoritesRemote`].
pub struct HttpFavoritesClient {
    client: Client,
    base_url: String,
}

/// Favorites API response envelope.
#[derive(Debug, Deserialize)]
struct FavoritesEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<FavoritesData>,
}

/// Favorites payload wrapper.
#[derive(Debug, Deserialize)]
struct FavoritesData {
    #[serde(default)]
    favorites: Vec<Value>,
}

impl HttpFavoritesClient {
    /// Create a new favorites client.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl FavoritesRemote for HttpFavoritesClient {
    fn list(&self, user_id: i64) -> Result<Vec<Value>> {
        let url = format!("{}/favorites?user_id={}", self.base_url, user_id);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .context("Failed to fetch favorites")?;

        if !response.status().is_success() {
            anyhow::bail!("Favorites request failed: {}", response.status());
        }

        let envelope: FavoritesEnvelope = response
            .json()
            .context("Failed to parse favorites response")?;

        if !envelope.success {
            anyhow::bail!(
                "Favorites API error: {}",
                envelope.message.unwrap_or_else(|| "Unknown error".into())
            );
        }

        Ok(envelope.data.map(|d| d.favorites).unwrap_or_default())
    }

    fn create(&self, user_id: i64, build_data: &str) -> Result<Option<i64>> {
        let body = json!({ "user_id": user_id, "build_data": build_data });

        let response = self
            .client
            .post(format!("{}/favorites", self.base_url))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .context("Failed to save favorite")?;

        if !response.status().is_success() {
            anyhow::bail!("Favorite create failed: {}", response.status());
        }

        let body: Value = response.json().unwrap_or(Value::Null);
        Ok(created_id(&body))
    }

    fn delete(&self, user_id: i64, favorite_id: i64) -> Result<()> {
        let url = format!(
            "{}/favorites/{}?user_id={}",
            self.base_url, favorite_id, user_id
        );

        let response = self
            .client
            .delete(&url)
            .header("Accept", "application/json")
            .send()
            .context("Failed to delete favorite")?;

        if !response.status().is_success() {
            anyhow::bail!("Favorite delete failed: {}", response.status());
        }

        Ok(())
    }
}

/// The created row id, wherever the API nested it in the response.
fn created_id(body: &Value) -> Option<i64> {
    let data = body.get("data").unwrap_or(body);
    let row = data.get("favorite").unwrap_or(data);
    row.get("id").and_then(Value::as_i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_id_is_found_at_any_nesting() {
        assert_eq!(created_id(&json!({ "id": 9 })), Some(9));
        assert_eq!(created_id(&json!({ "data": { "id": 9 } })), Some(9));
        assert_eq!(
            created_id(&json!({ "data": { "favorite": { "id": 9 } } })),
            Some(9)
        );
        assert_eq!(created_id(&Value::Null), None);
        assert_eq!(created_id(&json!({ "data": {} })), None);
    }
}
