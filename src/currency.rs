//! Display-currency conversion rate.
//!
//! The rate endpoint is an external collaborator returning
//! `{ result: "success", conversion_rate }`. The last good rate is
//! cached at `~/.autobuild/rate.json` with a freshness window checked
//! via file mtime. A rate outage never blocks anything: live fetch,
//! then fresh cache, then base-currency display only.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// How long a cached rate stays fresh.
const RATE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Resolve the rate endpoint from the environment, if configured.
pub fn rate_url() -> Option<String> {
    std::env::var("AUTOBUILD_RATE_URL").ok()
}

/// Cached conversion rate.
#[derive(Debug, Serialize, Deserialize)]
struct CachedRate {
    conversion_rate: f64,
}

/// Rate API response.
#[derive(Debug, Deserialize)]
struct RateResponse {
    #[serde(default)]
    result: String,
    #[serde(default)]
    conversion_rate: f64,
}

/// File-backed rate cache with a time-to-live based on file mtime.
pub struct RateCache {
    path: PathBuf,
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RateCache {
    /// Create a new rate cache.
    ///
    /// Cache location: `~/.autobuild/rate.json`, TTL: 24 hours.
    pub fn new() -> Self {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".autobuild")
            .join("rate.json");

        Self { path }
    }

    /// Cache at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the cached rate if it exists and hasn't expired.
    pub fn load(&self) -> Option<f64> {
        let metadata = fs::metadata(&self.path).ok()?;
        let modified = metadata.modified().ok()?;

        // Check TTL via mtime
        if modified.elapsed().unwrap_or(Duration::MAX) > RATE_TTL {
            return None;
        }

        let content = fs::read_to_string(&self.path).ok()?;
        let cached: CachedRate = serde_json::from_str(&content).ok()?;
        Some(cached.conversion_rate)
    }

    /// Save a rate, best-effort.
    pub fn save(&self, rate: f64) {
        if let Some(parent) = self.path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return;
            }
        }

        if let Ok(content) = serde_json::to_string_pretty(&CachedRate {
            conversion_rate: rate,
        }) {
            let _ = fs::write(&self.path, content);
        }
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the cached rate file.
    pub fn clear(&self) -> std::io::Result<bool> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Fetch a fresh conversion rate from the collaborator endpoint.
pub fn fetch_rate(client: &Client, url: &str) -> Result<f64> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .context("Failed to fetch conversion rate")?;

    if !response.status().is_success() {
        anyhow::bail!("Rate request failed: {}", response.status());
    }

    let body: RateResponse = response.json().context("Failed to parse rate response")?;

    if body.result != "success" {
        anyhow::bail!("Rate API error: {}", body.result);
    }

    Ok(body.conversion_rate)
}

/// Current conversion rate: live fetch, then fresh cache, then `None`.
///
/// `None` means prices are shown in the base currency only.
pub fn current_rate(cache: &RateCache) -> Option<f64> {
    let url = match rate_url() {
        Some(url) => url,
        None => return cache.load(),
    };

    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .ok()?;

    match fetch_rate(&client, &url) {
        Ok(rate) => {
            cache.save(rate);
            Some(rate)
        }
        Err(_) => cache.load(),
    }
}

/// Apply the opaque conversion multiplier.
pub fn convert(price: f64, rate: f64) -> f64 {
    price * rate
}

/// Format a base-currency price in Philippine pesos.
pub fn format_peso(price: f64) -> String {
    format!("₱{}", group_thousands(price))
}

/// Two decimals, integer part grouped with commas.
fn group_thousands(price: f64) -> String {
    let formatted = format!("{:.2}", price);
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or(("0", "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}.{}", grouped, dec_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_peso_formatting() {
        assert_eq!(format_peso(0.0), "₱0.00");
        assert_eq!(format_peso(199.99), "₱199.99");
        assert_eq!(format_peso(12_345.5), "₱12,345.50");
        assert_eq!(format_peso(1_234_567.0), "₱1,234,567.00");
    }

    #[test]
    fn test_rate_cache_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = RateCache::with_path(dir.path().join("rate.json"));

        assert!(cache.load().is_none());

        cache.save(57.21);
        assert_eq!(cache.load(), Some(57.21));

        assert!(cache.clear().unwrap());
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_corrupt_rate_cache_reads_as_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rate.json");
        std::fs::write(&path, "not json").unwrap();

        let cache = RateCache::with_path(path);
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_convert_is_a_plain_multiplier() {
        assert_eq!(convert(100.0, 0.5), 50.0);
    }
}
