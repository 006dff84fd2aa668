use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};

pub const MAX_TOKENS: u32 = 150;

/// Something that turns a prompt into a completion.
pub trait ModelClient {
    fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAiClient {
    agent: ureq::Agent,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            url: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url, &config.api_key, &config.model)
    }
}

impl ModelClient for OpenAiClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
        };

        debug!(url = %self.url, model = %self.model, "sending completion request");
        let response = match self
            .agent
            .post(&self.url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_json(&body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response
                    .into_string()
                    .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
                return Err(Error::Upstream { status, body });
            }
            Err(ureq::Error::Transport(e)) => return Err(Error::Transport(e.to_string())),
        };

        let parsed: ChatResponse = response
            .into_json()
            .map_err(|e| Error::Response(format!("failed to parse body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Response("no choices in completion".to_string()))
    }
}
