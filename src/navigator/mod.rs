//! Navigator advice
//!
//! Provides:
//! - AdviceProvider: one call, snapshot in, commentary out
//! - NavigatorClient: OpenAI-compatible chat completions over HTTP
//! - Rate limiting per battle
//! - Fallback lines for every failure, so nothing escapes the boundary

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::battle::BattleState;
use crate::content::Faction;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "NAVIGATOR_API_KEY";

pub const FALLBACK_NO_KEY: &str = "Senpai! I can't connect to the database (API Key missing)!";
pub const FALLBACK_ERROR: &str = "Signal interference! I can't analyze them right now!";
pub const FALLBACK_EMPTY: &str = "Be careful everyone!";
pub const FALLBACK_RATE_LIMITED: &str = "Hold on, Senpai! I'm still scanning them!";

const SYSTEM_PROMPT: &str = "\
You are \"Rise\", a high-energy, supportive, and analytical Battle Navigator in a Persona-style RPG.
You are speaking to the team leader \"Senpai\" (Yu).
Your goal is to analyze the battlefield and provide brief, tactical advice (max 2 sentences).
Use a pop, idol-like, enthusiastic tone.
If enemies are weak to something, shout it out.
If the team is low on health, warn them frantically.
Never mention game mechanics like \"HP integer\", instead use \"looking tired\" or \"stumbling\".
Format the output as plain text.";

/// Supplies tactical commentary for a battle
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    /// Never fails: problems come back as a fallback line
    async fn tactical_advice(&self, snapshot: &BattleState) -> String;
}

/// Always says the same thing
#[derive(Debug, Clone)]
pub struct CannedAdvice(pub String);

#[async_trait]
impl AdviceProvider for CannedAdvice {
    async fn tactical_advice(&self, _snapshot: &BattleState) -> String {
        self.0.clone()
    }
}

/// Navigator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Base URL of an OpenAI-compatible API
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Advice requests allowed per battle per minute
    pub requests_per_minute: u32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.venice.ai/api/v1".to_string(),
            model: "llama-3.3-70b".to_string(),
            max_tokens: 100,
            temperature: 0.7,
            timeout_secs: 30,
            requests_per_minute: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(reqwest::StatusCode),

    #[error("empty response")]
    Empty,
}

/// Chat message for the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Token bucket per key
#[derive(Debug)]
pub struct RateLimiter {
    /// key -> (tokens, last_refill)
    buckets: RwLock<HashMap<String, (f32, Instant)>>,
    max_tokens: u32,
    /// Tokens per second
    refill_rate: f32,
}

impl RateLimiter {
    /// Create a new rate limiter allowing `per_minute` requests a minute
    pub fn new(per_minute: u32) -> Self {
        let per_minute = per_minute.max(1);
        Self {
            buckets: RwLock::new(HashMap::new()),
            max_tokens: per_minute,
            refill_rate: per_minute as f32 / 60.0,
        }
    }

    /// Consume a token (returns false if rate limited).
    ///
    /// Buckets that have refilled completely are dropped; a missing bucket
    /// counts as full.
    pub async fn consume(&self, key: &str) -> bool {
        let mut buckets = self.buckets.write().await;
        let now = Instant::now();

        let (tokens, last_refill) = buckets
            .entry(key.to_string())
            .or_insert((self.max_tokens as f32, now));

        let refilled = self.refilled(*tokens, *last_refill);
        *last_refill = now;
        let allowed = refilled >= 1.0;
        *tokens = if allowed { refilled - 1.0 } else { refilled };

        let full = self.max_tokens as f32;
        buckets.retain(|_, (tokens, last_refill)| self.refilled(*tokens, *last_refill) < full);
        allowed
    }

    fn refilled(&self, tokens: f32, last_refill: Instant) -> f32 {
        let elapsed = last_refill.elapsed().as_secs_f32();
        (tokens + elapsed * self.refill_rate).min(self.max_tokens as f32)
    }
}

/// Describe the battlefield for the model
pub fn build_prompt(state: &BattleState) -> String {
    let heroes = state
        .units()
        .iter()
        .filter(|u| u.faction == Faction::Hero)
        .map(|h| format!("{}: {}% HP", h.name, h.hp_percent()))
        .collect::<Vec<_>>()
        .join(", ");

    let enemies = state
        .units()
        .iter()
        .filter(|u| u.faction == Faction::Enemy)
        .map(|e| {
            let weaknesses = e
                .profile
                .weaknesses()
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let status = if e.is_down() { "DOWN" } else { "Standing" };
            format!("{} (Weakness: {}, Status: {})", e.name, weaknesses, status)
        })
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        "Current Battle Status:\nHeroes: {}\nEnemies: {}\n\nWhat should we do next, Rise?",
        heroes, enemies
    )
}

/// HTTP navigator
#[derive(Debug)]
pub struct NavigatorClient {
    client: Client,
    api_key: Option<String>,
    config: NavigatorConfig,
    rate_limiter: RateLimiter,
}

impl NavigatorClient {
    /// Create a new client, reading the key from `NAVIGATOR_API_KEY`
    pub fn new(config: NavigatorConfig) -> Result<Self, NavigatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            rate_limiter: RateLimiter::new(config.requests_per_minute),
            config,
        })
    }

    /// Create a shared instance
    pub fn shared(config: NavigatorConfig) -> Result<Arc<Self>, NavigatorError> {
        Ok(Arc::new(Self::new(config)?))
    }

    /// Override the key picked up from the environment
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Check if API key is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the model about the current battle
    pub async fn advise(&self, state: &BattleState) -> Result<String, NavigatorError> {
        let api_key = self.api_key.as_ref().ok_or(NavigatorError::MissingApiKey)?;

        if !self.rate_limiter.consume(&state.id.to_string()).await {
            return Err(NavigatorError::RateLimited);
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(&build_prompt(state)),
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending navigator request: {}", request.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Navigator API error: {} - {}", status, body);
            return Err(NavigatorError::Api(status));
        }

        let chat_response: ChatResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(NavigatorError::Empty)
    }
}

#[async_trait]
impl AdviceProvider for NavigatorClient {
    async fn tactical_advice(&self, snapshot: &BattleState) -> String {
        match self.advise(snapshot).await {
            Ok(text) => text,
            Err(NavigatorError::MissingApiKey) => FALLBACK_NO_KEY.to_string(),
            Err(NavigatorError::RateLimited) => FALLBACK_RATE_LIMITED.to_string(),
            Err(NavigatorError::Empty) => FALLBACK_EMPTY.to_string(),
            Err(e) => {
                warn!("Navigator advice failed: {}", e);
                FALLBACK_ERROR.to_string()
            }
        }
    }
}
