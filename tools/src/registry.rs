//! Registrar list API client, used as a real-inventory override.

use anyhow::{bail, Context, Result};
use funstr_core::inventory::{normalize_registry_rows, DomainRecord};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.godaddy.com";

pub struct RegistryClient {
    client: reqwest::blocking::Client,
    base_url: String,
    key: String,
    secret: String,
}

impl RegistryClient {
    /// `None` unless both `GODADDY_API_KEY` and `GODADDY_API_SECRET` are set.
    pub fn from_env(timeout: Duration) -> Result<Option<Self>> {
        let key = std::env::var("GODADDY_API_KEY").unwrap_or_default();
        let secret = std::env::var("GODADDY_API_SECRET").unwrap_or_default();
        if key.is_empty() || secret.is_empty() {
            return Ok(None);
        }
        let base_url = std::env::var("GODADDY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Some(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key,
            secret,
        }))
    }

    pub fn fetch_domains(&self) -> Result<Vec<DomainRecord>> {
        let url = format!("{}/v1/domains", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("Authorization", format!("sso-key {}:{}", self.key, self.secret))
            .send()
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        let body: serde_json::Value = resp.json().context("registry reply is not JSON")?;
        if !status.is_success() {
            bail!("registry request failed ({status}): {body}");
        }
        let Some(rows) = body.as_array() else {
            bail!("unexpected registry reply shape (expected an array)");
        };

        let domains = normalize_registry_rows(rows);
        log::info!("registry returned {} domains", domains.len());
        Ok(domains)
    }
}
