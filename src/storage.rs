//! Client for the storage API's create endpoint
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tracing::warn;

use crate::{
    error::{IngesterError, StorageUnavailable},
    predictor::json_client,
    record::EnrichedRecord,
};

/// What the storage API says back on success. Both fields are optional,
/// a success status alone is enough to count the record as stored.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct StorageAck {
    pub id: Option<i64>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct StorageFailure {
    error: String,
}

pub struct StorageClient {
    client: reqwest::Client,
    url: Url,
}

impl StorageClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, IngesterError> {
        let url = Url::parse(url).map_err(|e| IngesterError::InvalidUrl {
            name: "storage",
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client: json_client(timeout)?,
            url,
        })
    }

    pub async fn store(&self, record: &EnrichedRecord) -> Result<StorageAck, StorageUnavailable> {
        let response = self
            .client
            .post(self.url.clone())
            .json(record)
            .send()
            .await
            .map_err(StorageUnavailable::Request)?;

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!(%status, error = %e, "failed to read storage response body");
                Default::default()
            }
        };
        if !status.is_success() {
            let message = serde_json::from_slice::<StorageFailure>(&body)
                .map(|f| f.error)
                .ok();
            return Err(StorageUnavailable::Rejected { status, message });
        }

        // the status already confirms the write
        Ok(serde_json::from_slice(&body).unwrap_or_else(|e| {
            if !body.is_empty() {
                warn!(%status, error = %e, "unreadable storage acknowledgement");
            }
            StorageAck::default()
        }))
    }
}
