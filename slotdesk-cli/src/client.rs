//! HTTP client for the scheduling backend.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Response;
use serde::de::DeserializeOwned;
use slotdesk_core::config::SlotDeskConfig;
use slotdesk_core::{LogMessage, Request, ScheduleEntry, SchedulePayload, Timestamp};
use url::Url;

pub struct Client {
    http: reqwest::Client,
    base_url: Url,
}

impl Client {
    pub fn new(config: &SlotDeskConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base_url '{}'", config.base_url))?;

        // Url::join drops the last path segment unless it ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Client { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid endpoint '{path}'"))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to reach the scheduling backend")?;

        Ok(check(resp).await?.json().await?)
    }

    /// GET /api/schedule
    pub async fn fetch_schedule(&self) -> Result<Vec<ScheduleEntry>> {
        self.get_json("api/schedule").await
    }

    /// POST /api/schedule
    pub async fn save_schedule(&self, payload: &SchedulePayload) -> Result<()> {
        let url = self.endpoint("api/schedule")?;
        tracing::debug!(%url, dates = payload.dates.len(), "POST");

        let resp = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await
            .context("Failed to reach the scheduling backend")?;

        check(resp).await?;
        Ok(())
    }

    /// GET /api/schedule/available
    pub async fn available_dates(&self) -> Result<Vec<Timestamp>> {
        self.get_json("api/schedule/available").await
    }

    /// GET /api/schedule/booked: requests waiting for approval
    pub async fn booked_requests(&self) -> Result<Vec<Request>> {
        self.get_json("api/schedule/booked").await
    }

    /// GET /api/schedule/approved
    pub async fn approved_requests(&self) -> Result<Vec<Request>> {
        self.get_json("api/schedule/approved").await
    }

    /// PUT /api/request/:date
    pub async fn cancel_request(&self, date: Timestamp) -> Result<()> {
        let url = self.endpoint(&format!("api/request/{}", date.millis()))?;
        tracing::debug!(%url, "PUT");

        let resp = self
            .http
            .put(url)
            .send()
            .await
            .context("Failed to reach the scheduling backend")?;

        check(resp).await?;
        Ok(())
    }

    /// POST /api/logs
    pub async fn send_log(&self, message: &str) -> Result<()> {
        let url = self.endpoint("api/logs")?;

        let resp = self
            .http
            .post(url)
            .json(&LogMessage {
                message: message.to_string(),
            })
            .send()
            .await
            .context("Failed to reach the scheduling backend")?;

        check(resp).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into an error carrying the backend's message.
async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let body = body.trim();
    if body.is_empty() {
        anyhow::bail!("Backend returned {status}");
    }
    anyhow::bail!("Backend returned {status}: {body}")
}
