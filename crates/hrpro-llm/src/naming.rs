// `Namer` backed by the Claude API.
//
// Each call runs one streaming request to completion and post-processes the
// text. Every failure path (disabled client, transport error, timeout,
// unparseable reply) degrades to the locale fallbacks and is only logged.

use std::time::Duration;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use hrpro_core::config::Config;
use hrpro_core::labels::Locale;
use hrpro_core::naming::Namer;
use hrpro_core::protocol::LlmEvent;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::LlmClient;
use crate::prompt::{congratulation_prompt, team_names_prompt, Prompt};

/// Upper bound on a single naming request, stream included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct LlmNamer {
    client: LlmClient,
    locale: Locale,
    team_names_max_tokens: u32,
    congratulation_max_tokens: u32,
    timeout: Duration,
}

impl LlmNamer {
    pub fn new(client: LlmClient, locale: Locale) -> Self {
        LlmNamer {
            client,
            locale,
            team_names_max_tokens: 300,
            congratulation_max_tokens: 120,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Build from config: client, locale, and token budgets.
    pub fn from_config(config: &Config) -> Self {
        LlmNamer {
            team_names_max_tokens: config.llm.team_names_max_tokens,
            congratulation_max_tokens: config.llm.congratulation_max_tokens,
            ..LlmNamer::new(LlmClient::from_config(config), config.general.locale)
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_enabled()
    }

    /// Run one request to completion and return the full reply text.
    async fn complete(&self, prompt: &Prompt, max_tokens: u32) -> anyhow::Result<String> {
        if !self.client.is_enabled() {
            bail!("LLM not configured");
        }

        let (tx, mut rx) = mpsc::channel(64);
        let collect = async move {
            let mut outcome = Err(anyhow!("stream closed without a result"));
            while let Some(event) = rx.recv().await {
                match event {
                    LlmEvent::Token { .. } => {}
                    LlmEvent::Complete {
                        full_text,
                        input_tokens,
                        output_tokens,
                        stop_reason,
                    } => {
                        debug!(input_tokens, output_tokens, ?stop_reason, "naming request complete");
                        outcome = Ok(full_text);
                    }
                    LlmEvent::Error { message } => {
                        outcome = Err(anyhow!(message));
                    }
                }
            }
            outcome
        };

        let request = async {
            let (sent, outcome) = tokio::join!(
                self.client
                    .stream_message(&prompt.system, &prompt.user, max_tokens, tx),
                collect
            );
            sent?;
            outcome
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| anyhow!("request timed out after {:?}", self.timeout))?
    }

    fn fallback_team_names(&self, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| self.locale.fallback_group_name(i))
            .collect()
    }
}

#[async_trait]
impl Namer for LlmNamer {
    async fn generate_team_names(&self, count: usize) -> Vec<String> {
        if count == 0 {
            return Vec::new();
        }
        if !self.is_enabled() {
            return self.fallback_team_names(count);
        }

        let prompt = team_names_prompt(self.locale, count);
        match self.complete(&prompt, self.team_names_max_tokens).await {
            Ok(text) => match parse_team_names(&text, count) {
                Some(names) => {
                    info!("Generated {} team names", names.len());
                    names
                }
                None => {
                    warn!("Could not parse team names from reply: {text:?}");
                    self.fallback_team_names(count)
                }
            },
            Err(e) => {
                warn!("Team name generation failed: {e}");
                self.fallback_team_names(count)
            }
        }
    }

    async fn generate_congratulation(&self, name: &str) -> String {
        if !self.is_enabled() {
            return self.locale.fallback_congratulation(name);
        }

        let prompt = congratulation_prompt(self.locale, name);
        match self.complete(&prompt, self.congratulation_max_tokens).await {
            Ok(text) => match clean_congratulation(&text) {
                Some(message) => message,
                None => {
                    warn!("Empty congratulation reply, using fallback");
                    self.locale.fallback_congratulation(name)
                }
            },
            Err(e) => {
                warn!("Congratulation generation failed: {e}");
                self.locale.fallback_congratulation(name)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Reply parsing
// ---------------------------------------------------------------------------

/// Pull a JSON array of names out of a model reply.
///
/// Tolerates surrounding prose and code fences. Non-string entries become
/// empty strings so later names keep their positions. Returns `None` when no
/// usable array is found; truncates to `count`.
pub fn parse_team_names(text: &str, count: usize) -> Option<Vec<String>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }

    let values: Vec<Value> = serde_json::from_str(&text[start..=end]).ok()?;
    let mut names: Vec<String> = values
        .iter()
        .map(|v| v.as_str().map(str::trim).unwrap_or_default().to_string())
        .collect();
    names.truncate(count);

    if names.iter().all(String::is_empty) {
        return None;
    }
    Some(names)
}

/// Trim whitespace and one layer of wrapping quotes.
fn clean_congratulation(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let unquoted = ['"', '\u{201c}', '\u{300c}']
        .iter()
        .zip(['"', '\u{201d}', '\u{300d}'])
        .find_map(|(open, close)| {
            trimmed
                .strip_prefix(*open)
                .and_then(|s| s.strip_suffix(close))
        })
        .unwrap_or(trimmed)
        .trim();
    (!unquoted.is_empty()).then(|| unquoted.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
