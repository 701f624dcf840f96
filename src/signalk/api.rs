// src/signalk/api.rs
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};

use super::http_base;

/// Read `vessels/self/name` from the server's REST API.
/// Returns None when the server has no name configured.
pub async fn fetch_vessel_name(client: &Client, server_url: &str) -> Result<Option<String>> {
    let url = format!(
        "{}/signalk/v1/api/vessels/self/name",
        http_base(server_url)
    );
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    let response = response
        .error_for_status()
        .with_context(|| format!("Failed to read vessel name from {}", url))?;

    // The endpoint answers with a bare JSON string; some servers wrap it in
    // {"value": ...}
    let body: serde_json::Value = response.json().await.context("Invalid vessel name")?;
    let name = body
        .as_str()
        .or_else(|| body.get("value").and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Ok(name)
}
