use super::console::{ChatTurn, Role};
use crate::config::RelayResolvedConfig;
use crate::error::{IsRetryable, RelayError};
use crate::model_catalog::ModelDescriptor;
use crate::utils::logging::debug_json;
use bytecc_schema::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use std::{sync::Arc, time::Instant};
use tracing::{debug, info, warn};

const EMPTY_REPLY: &str = "No response generated.";

/// Text shown in place of a reply when the completion call fails.
pub fn relay_failure_message(model: &ModelDescriptor) -> String {
    format!(
        "Error connecting to {}. Please check your connection and try again.",
        model.name
    )
}

/// Stateless relay to the completion router.
///
/// One attempt per call, no retries. The router key comes from server configuration and is
/// only ever attached here.
#[derive(Clone)]
pub struct ChatRelay {
    client: reqwest::Client,
    cfg: Arc<RelayResolvedConfig>,
}

impl ChatRelay {
    pub fn new(cfg: Arc<RelayResolvedConfig>, client: reqwest::Client) -> Self {
        Self { client, cfg }
    }

    /// Upstream message list: configured system prompt, then every non-system turn in order.
    pub fn build_messages(&self, transcript: &[ChatTurn]) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::new(
            Role::System.as_str(),
            self.cfg.system_prompt.as_str(),
        ))
        .chain(
            transcript
                .iter()
                .filter(|turn| turn.role != Role::System)
                .map(|turn| ChatMessage::new(turn.role.as_str(), turn.content.as_str())),
        )
        .collect()
    }

    /// Generated text for `transcript`, or a failure message naming `model`. Never errors.
    pub async fn complete(&self, transcript: &[ChatTurn], model: &ModelDescriptor) -> String {
        let start = Instant::now();
        match self.try_complete(transcript, model).await {
            Ok(text) => {
                info!(
                    model = model.id,
                    took_ms = start.elapsed().as_millis() as u64,
                    reply_chars = text.chars().count(),
                    "[Relay] completion ok"
                );
                text
            }
            Err(err) => {
                warn!(
                    model = model.id,
                    took_ms = start.elapsed().as_millis() as u64,
                    retryable = err.is_retryable(),
                    error = %err,
                    "[Relay] completion failed"
                );
                relay_failure_message(model)
            }
        }
    }

    async fn try_complete(
        &self,
        transcript: &[ChatTurn],
        model: &ModelDescriptor,
    ) -> Result<String, RelayError> {
        if self.cfg.api_key.trim().is_empty() {
            return Err(RelayError::MissingApiKey);
        }

        let body = ChatCompletionRequest {
            model: model.id.to_string(),
            messages: self.build_messages(transcript),
            max_tokens: self.cfg.max_tokens,
            temperature: self.cfg.temperature,
        };
        debug!(
            model = model.id,
            messages = body.messages.len(),
            "[Relay] POST {}",
            self.cfg.api_url
        );
        debug_json("[Relay] request body", &body);

        let resp = self
            .client
            .post(self.cfg.api_url.clone())
            .bearer_auth(&self.cfg.api_key)
            .header("HTTP-Referer", &self.cfg.app_url)
            .header("X-Title", &self.cfg.app_title)
            .timeout(self.cfg.request_timeout)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(RelayError::UpstreamStatus(resp.status()));
        }

        let parsed: ChatCompletionResponse = resp.json().await?;
        Ok(parsed
            .first_text()
            .map_or_else(|| EMPTY_REPLY.to_string(), str::to_string))
    }
}
