//! HTTP language-model explainer (Anthropic messages API).

use funstr_core::{
    error::{OracleError, OracleResult},
    explainer::{explainer_prompt, parse_explainer_reply, DomainExplainer},
    scorer::ScoreResult,
};
use std::time::Duration;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
const MAX_TOKENS: u32 = 1000;

pub struct AnthropicExplainer {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    tld: String,
}

#[derive(serde::Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(serde::Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicExplainer {
    /// `None` when `ANTHROPIC_API_KEY` is unset or empty.
    pub fn from_env(tld: &str, timeout: Duration) -> anyhow::Result<Option<Self>> {
        let Some(api_key) = std::env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.trim().is_empty())
        else {
            return Ok(None);
        };
        let model = std::env::var("FUNSTR_EXPLAINER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("funstr-runner/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Some(Self {
            client,
            api_key,
            model,
            tld: tld.to_string(),
        }))
    }
}

fn failed(e: impl std::fmt::Display) -> OracleError {
    OracleError::Explainer {
        reason: e.to_string(),
    }
}

impl DomainExplainer for AnthropicExplainer {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn explain(&self, domain: &str) -> OracleResult<ScoreResult> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": explainer_prompt(domain, &self.tld) }],
        });

        let resp = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .map_err(failed)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {status}")));
        }

        let reply: MessagesResponse = resp.json().map_err(failed)?;
        let text = reply
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| failed("reply has no text block"))?;
        log::debug!("explainer reply for {domain}: {} bytes", text.len());
        parse_explainer_reply(&text)
    }
}
