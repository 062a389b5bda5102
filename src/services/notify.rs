//! Chat notification side-channel
//!
//! Fire-and-forget posts to a chat endpoint. Nothing depends on delivery:
//! a failure is logged and forgotten.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};
use ureq::Agent;

use crate::config::NotifierConfig;
use crate::errors::{Result, VotelinkerError};

const NOTIFY_TIMEOUT_SECS: u64 = 5;

pub struct ChatNotifier {
    agent: Agent,
    config: NotifierConfig,
}

impl ChatNotifier {
    pub fn new(config: NotifierConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(NOTIFY_TIMEOUT_SECS)))
            .build()
            .into();
        Self { agent, config }
    }

    pub fn enabled(&self) -> bool {
        !self.config.token.is_empty() && !self.config.channel.is_empty()
    }

    /// Post a message to the configured channel. A disabled notifier is a
    /// no-op, not an error.
    pub fn post_message(&self, text: &str) -> Result<()> {
        if !self.enabled() {
            debug!("chat notifier not configured, skipping message");
            return Ok(());
        }

        let auth = format!("Bearer {}", self.config.token);
        self.agent
            .post(&self.config.url)
            .header("Authorization", auth.as_str())
            .send_json(json!({
                "channel": self.config.channel,
                "text": text,
            }))
            .map_err(|e| VotelinkerError::notify_server(e.to_string()))?;
        Ok(())
    }

    /// Same as [`post_message`](Self::post_message) but only ever logs.
    pub fn post_best_effort(&self, text: &str) {
        if let Err(e) = self.post_message(text) {
            warn!("chat notification failed: {e}");
        }
    }
}
