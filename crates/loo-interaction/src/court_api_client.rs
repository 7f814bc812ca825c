//! CourtApiClient - HTTP implementation of the decision service boundary.
//!
//! Talks to the Lucky Loo court API: `POST /api/judge` for submissions and
//! `GET /api/health` for the startup probe. The base URL comes from the
//! `LOO_COURT_URL` environment variable when set.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use loo_core::error::{LooError, Result};
use loo_core::session::{DecisionClient, PleaSubmission};
use loo_core::verdict::{Outcome, Verdict};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const JUDGE_PATH: &str = "/api/judge";
const HEALTH_PATH: &str = "/api/health";

/// Client for the court HTTP API.
///
/// Deliberately built without a request timeout: the submission protocol
/// blocks (asynchronously) until the court resolves or rejects, and the
/// controller turns any failure into the offline fallback verdict.
#[derive(Clone)]
pub struct CourtApiClient {
    client: Client,
    base_url: String,
}

impl CourtApiClient {
    /// Creates a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Loads configuration from the environment.
    ///
    /// Uses `LOO_COURT_URL` when set, otherwise `http://localhost:8000`.
    pub fn from_env() -> Self {
        let base_url = env::var("LOO_COURT_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    /// Probes `GET /api/health`.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| LooError::transport(format!("health check failed: {err}")))?;

        if !response.status().is_success() {
            return Err(LooError::transport(format!(
                "health check returned {}",
                response.status()
            )));
        }

        response.json::<HealthStatus>().await.map_err(|err| {
            LooError::Serialization {
                format: "JSON".to_string(),
                message: format!("failed to parse health response: {err}"),
            }
        })
    }
}

#[async_trait]
impl DecisionClient for CourtApiClient {
    async fn judge(&self, submission: PleaSubmission) -> Result<Verdict> {
        let body = PleaRequest {
            plea: &submission.plea,
            image_base64: submission
                .image
                .as_ref()
                .map(|image| BASE64_STANDARD.encode(&image.data)),
            demo_mode: submission.demo_mode,
        };

        let url = format!("{}{}", self.base_url, JUDGE_PATH);
        tracing::debug!(%url, demo_mode = body.demo_mode, "sending plea to the court");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| LooError::transport(format!("court request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read court error body".to_string());
            return Err(LooError::transport(format!(
                "court returned {status}: {body_text}"
            )));
        }

        let parsed: VerdictResponse =
            response
                .json()
                .await
                .map_err(|err| LooError::Serialization {
                    format: "JSON".to_string(),
                    message: format!("failed to parse court response: {err}"),
                })?;

        Ok(parsed.into())
    }
}

#[derive(Serialize)]
struct PleaRequest<'a> {
    plea: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_base64: Option<String>,
    demo_mode: bool,
}

#[derive(Deserialize)]
struct VerdictResponse {
    verdict: Outcome,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    roast: String,
    #[serde(default)]
    jury_votes: HashMap<String, String>,
}

impl From<VerdictResponse> for Verdict {
    fn from(response: VerdictResponse) -> Self {
        Self {
            outcome: response.verdict,
            reasoning: response.reasoning,
            roast: response.roast,
            jury_votes: response.jury_votes,
        }
    }
}

/// `GET /api/health` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
}
