//! Outbound client for the third-party avatar lookup API.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::AvatarConfig;

#[async_trait]
pub trait AvatarLookup: Send + Sync {
    /// Raw response body for `email`.
    async fn lookup(&self, email: &str) -> anyhow::Result<String>;
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
}

/// Posts the configured credentials plus the email as JSON. No retry.
#[derive(Clone)]
pub struct AvatarApi {
    client: Client,
    config: AvatarConfig,
}

impl AvatarApi {
    pub fn new(config: AvatarConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl AvatarLookup for AvatarApi {
    async fn lookup(&self, email: &str) -> anyhow::Result<String> {
        let resp = self
            .client
            .post(&self.config.api_url)
            .json(&LookupRequest {
                username: &self.config.username,
                password: &self.config.password,
                email,
            })
            .send()
            .await
            .context("avatar lookup request failed")?;

        if !resp.status().is_success() {
            return Err(anyhow!("avatar lookup → {}", resp.status()));
        }
        resp.text().await.context("reading avatar lookup body")
    }
}
