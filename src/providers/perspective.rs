//! Comment analyzer classifier
//!
//! Scores text through the `v1alpha1/comments:analyze` endpoint. One request
//! per message; only the categories active for the community are requested.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;
use tracing::debug;

use crate::defaults;
use crate::error::{ModerationError, Result};
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::traits::Classifier;
use crate::types::Category;

/// Connection settings for the comment analyzer.
#[derive(Debug, Clone)]
pub struct PerspectiveConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub languages: Vec<String>,
    pub timeout: Duration,
    /// `None` means a single attempt per message.
    pub retry_policy: Option<RetryPolicy>,
}

impl PerspectiveConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: defaults::classifier::PERSPECTIVE_BASE_URL.to_string(),
            languages: vec!["en".to_string()],
            timeout: defaults::classifier::REQUEST_TIMEOUT,
            retry_policy: None,
        }
    }

    pub fn builder(api_key: impl Into<String>) -> PerspectiveConfigBuilder {
        PerspectiveConfigBuilder {
            config: Self::new(api_key),
        }
    }

    /// Reads the key from `PERSPECTIVE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(defaults::classifier::API_KEY_ENV).map_err(|_| {
            ModerationError::InvalidConfiguration(format!(
                "{} is not set",
                defaults::classifier::API_KEY_ENV
            ))
        })?;
        if key.trim().is_empty() {
            return Err(ModerationError::InvalidConfiguration(format!(
                "{} is empty",
                defaults::classifier::API_KEY_ENV
            )));
        }
        Ok(Self::new(key))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1alpha1/comments:analyze",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug)]
pub struct PerspectiveConfigBuilder {
    config: PerspectiveConfig,
}

impl PerspectiveConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry_policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<PerspectiveConfig> {
        if self.config.api_key.expose_secret().trim().is_empty() {
            return Err(ModerationError::InvalidConfiguration(
                "classifier API key cannot be empty".into(),
            ));
        }
        if self.config.languages.is_empty() {
            return Err(ModerationError::InvalidConfiguration(
                "at least one language is required".into(),
            ));
        }
        Ok(self.config)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    comment: Comment<'a>,
    requested_attributes: BTreeMap<Category, EmptyObject>,
    languages: &'a [String],
}

#[derive(Debug, Serialize)]
struct Comment<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct EmptyObject {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    #[serde(default)]
    attribute_scores: HashMap<String, AttributeScore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeScore {
    summary_score: SummaryScore,
}

#[derive(Debug, Deserialize)]
struct SummaryScore {
    value: f64,
}

/// [`Classifier`] backed by the comment analyzer HTTP API.
#[derive(Debug, Clone)]
pub struct PerspectiveClassifier {
    config: PerspectiveConfig,
    http_client: reqwest::Client,
}

impl PerspectiveClassifier {
    pub fn new(config: PerspectiveConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(defaults::classifier::USER_AGENT)
            .build()
            .map_err(|e| ModerationError::HttpError(format!("Failed to build client: {e}")))?;
        Ok(Self::with_http_client(config, http_client))
    }

    pub const fn with_http_client(config: PerspectiveConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &PerspectiveConfig {
        &self.config
    }

    async fn analyze_once(
        &self,
        text: &str,
        requested: &BTreeSet<Category>,
    ) -> Result<HashMap<Category, f64>> {
        let body = AnalyzeRequest {
            comment: Comment { text },
            requested_attributes: requested.iter().map(|c| (*c, EmptyObject {})).collect(),
            languages: &self.config.languages,
        };

        let response = self
            .http_client
            .post(self.config.endpoint())
            .query(&[("key", self.config.api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_response_error(response).await);
        }

        let parsed: AnalyzeResponse = response.json().await?;

        Ok(Self::convert_scores(parsed))
    }

    async fn handle_response_error(response: reqwest::Response) -> ModerationError {
        let status = response.status().as_u16();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        match status {
            400 => ModerationError::classifier(Some(400), format!("Bad request: {error_text}")),
            429 => ModerationError::classifier(Some(429), "Quota exceeded"),
            _ => ModerationError::classifier(Some(status), error_text),
        }
    }

    /// Attributes the enumeration does not know are ignored.
    fn convert_scores(response: AnalyzeResponse) -> HashMap<Category, f64> {
        response
            .attribute_scores
            .into_iter()
            .filter_map(|(name, score)| match name.parse::<Category>() {
                Ok(category) => Some((category, score.summary_score.value)),
                Err(_) => {
                    debug!(attribute = %name, "ignoring unknown attribute");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl Classifier for PerspectiveClassifier {
    async fn analyze(
        &self,
        text: &str,
        requested: &BTreeSet<Category>,
    ) -> Result<HashMap<Category, f64>> {
        if requested.is_empty() {
            return Err(ModerationError::EmptyScoreSet);
        }
        match &self.config.retry_policy {
            Some(policy) => {
                RetryExecutor::new(policy.clone())
                    .execute(|| self.analyze_once(text, requested))
                    .await
            }
            None => self.analyze_once(text, requested).await,
        }
    }

    fn name(&self) -> &'static str {
        "perspective"
    }
}
