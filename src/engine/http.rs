//! HTTP client for the analysis engine.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::protocol::{AnalyzeRequest, AnalyzeResponse, AssistRequest, AssistResponse};
use super::{AnalysisEngine, AssistEngine};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Talks JSON over HTTP to `<base_url>/analyze` and `<base_url>/assist`.
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: reqwest::Client,
    analyze_url: reqwest::Url,
    assist_url: reqwest::Url,
}

impl HttpEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let base = config.base_url.trim_end_matches('/');
        let parse = |path: &str| {
            let url = format!("{base}{path}");
            reqwest::Url::parse(&url).map_err(|err| EngineError::InvalidUrl {
                url,
                reason: err.to_string(),
            })
        };
        let analyze_url = parse("/analyze")?;
        let assist_url = parse("/assist")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(HttpEngine {
            client,
            analyze_url,
            assist_url,
        })
    }

    pub fn analyze_url(&self) -> &reqwest::Url {
        &self.analyze_url
    }

    pub fn assist_url(&self) -> &reqwest::Url {
        &self.assist_url
    }

    async fn post<Req, Resp>(&self, url: &reqwest::Url, body: &Req) -> Result<Resp, EngineError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();
        debug!(url:% = url, status = status.as_u16(); "engine responded");
        if !status.is_success() {
            return Err(EngineError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AnalysisEngine for HttpEngine {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, EngineError> {
        self.post(&self.analyze_url, request).await
    }
}

#[async_trait]
impl AssistEngine for HttpEngine {
    async fn assist(&self, request: &AssistRequest) -> Result<AssistResponse, EngineError> {
        self.post(&self.assist_url, request).await
    }
}
