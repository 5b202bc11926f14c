use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::model::{Centre, SaveTargetsRequest};
use crate::domain::ports::{RemoteSource, TargetStore};
use crate::utils::error::{PlannerError, Result};

fn build_client(timeout_secs: u64) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

fn join(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Centres of a work order from `GET {base}/work-orders/{id}/centres`.
pub struct HttpCentreSource {
    client: Client,
    base_url: String,
}

impl HttpCentreSource {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl RemoteSource<str> for HttpCentreSource {
    type Data = Vec<Centre>;

    async fn fetch(&self, work_order_id: &str) -> Result<Option<Vec<Centre>>> {
        let url = join(&self.base_url, &format!("work-orders/{}/centres", work_order_id));
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            tracing::warn!("Centre lookup returned {}", response.status());
            return Ok(None);
        }

        let centres: Vec<Centre> = response.json().await?;
        if centres.is_empty() {
            return Ok(None);
        }
        tracing::debug!("Fetched {} centres for work order {}", centres.len(), work_order_id);
        Ok(Some(centres))
    }
}

/// Stores both tracks with `POST {base}/work-orders/{id}/targets`.
pub struct HttpTargetStore {
    client: Client,
    base_url: String,
}

impl HttpTargetStore {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl TargetStore for HttpTargetStore {
    async fn save_targets(&self, request: &SaveTargetsRequest) -> Result<()> {
        let url = join(
            &self.base_url,
            &format!("work-orders/{}/targets", request.work_order_id),
        );
        tracing::debug!("Posting targets to: {}", url);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PlannerError::PersistenceError {
            status: status.as_u16(),
            body,
        })
    }
}
