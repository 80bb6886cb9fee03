use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::PlannerConfig;

/// External text-generation backend behind the plan generator.
///
/// Implementations must resolve within their own bounded wait; callers treat
/// any error (including timeouts) as "backend unavailable" and fall back to
/// the synthetic plan.
#[async_trait]
pub trait PlanBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// OpenAI-style chat-completions client.
pub struct HttpPlanBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpPlanBackend {
    pub fn new(config: &PlannerConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build planner http client")?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl PlanBackend for HttpPlanBackend {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("plan backend request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("plan backend returned status {status}");
        }

        let payload: ChatResponse = response
            .json()
            .await
            .context("decode plan backend response")?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("plan backend returned no choices"))
    }
}
