use serde_json::Value;

use crate::config::base_url::chat_completions_url;
use crate::error::RelayError;

use super::types::{ChatCompletionRequest, UpstreamReply};

pub struct OpenAIProvider {
    client: reqwest::Client,
    url: String,
}

impl OpenAIProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: chat_completions_url(base_url),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    // 单次请求：不设超时、不重试、不走 SSE
    pub async fn chat_completions(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<UpstreamReply, RelayError> {
        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let raw = response.bytes().await?;
        // 上游无论成功失败都应返回 JSON；否则视为内部错误
        let body = serde_json::from_slice::<Value>(&raw)?;

        Ok(UpstreamReply { status, raw, body })
    }
}
