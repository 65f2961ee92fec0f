//! Client for the model-serving endpoint
use std::time::Duration;

use reqwest::{header, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{IngesterError, PredictionUnavailable},
    record::{FeatureVector, FEATURE_COLUMNS},
};

/// Body accepted by the serving endpoint: a single-row pandas "split" frame
#[derive(Serialize)]
struct PredictionRequest<'a> {
    dataframe_split: DataframeSplit<'a>,
}

#[derive(Serialize)]
struct DataframeSplit<'a> {
    columns: &'static [&'static str],
    data: [&'a FeatureVector; 1],
}

#[derive(Deserialize)]
struct PredictionResponse {
    predictions: Vec<f64>,
}

pub struct PredictionClient {
    client: reqwest::Client,
    url: Url,
}

impl PredictionClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, IngesterError> {
        let url = Url::parse(url).map_err(|e| IngesterError::InvalidUrl {
            name: "prediction",
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client: json_client(timeout)?,
            url,
        })
    }

    /// Asks the model for an estimate of one row. Single attempt, no retries.
    pub async fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionUnavailable> {
        let body = PredictionRequest {
            dataframe_split: DataframeSplit {
                columns: &FEATURE_COLUMNS,
                data: [features],
            },
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(PredictionUnavailable::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictionUnavailable::Status(status));
        }

        let parsed: PredictionResponse = response
            .json()
            .await
            .map_err(PredictionUnavailable::Response)?;
        debug!(predictions = parsed.predictions.len(), "prediction received");

        parsed
            .predictions
            .first()
            .copied()
            .ok_or(PredictionUnavailable::Empty)
    }
}

/// HTTP client shared by both collaborators: JSON content type and a hard request timeout
pub(crate) fn json_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(concat!("housing-consumer/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
}
