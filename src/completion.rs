// OpenRouter chat-completion client: single replies and the weekly post suggestion.

use std::time::{Duration, Instant};

use serde_json::Value;

use crate::config::CompletionConfig;
use crate::error::AppError;
use crate::metrics::{COMPLETION_ATTEMPTS, UPSTREAM_ERRORS, UPSTREAM_LATENCY};
use crate::models::{ChatMessage, ChatRequest, ChatResponse, ReplyLogEntry};
use crate::normalize::{REPLY_WORD_CAP, cap_words, prompt_body, take_chars};
use crate::retry::{Attempt, RetryPolicy, run_until_non_empty};

const REPLY_SYSTEM: &str = "You write a single reply to a tweet.
You sound like a real human, engaging and fresh. The reply must be fun.

RULES:
- Max 12 words.
- No uppercase letters at all.
- Do not end the reply with a period.
- Do not use emojis.
- Reply directly to what they said.
- Never sound like a bot or a brand account.
- A bit of wit, a hot take, a joke or a sharp one-liner.
- Casual, slang and abbreviations are fine.
- Never lecture, never explain.
- Output ONLY the reply text. No quotes, no explanation, no preamble.";

const SUGGEST_SYSTEM: &str = "You suggest one X (Twitter) post for a technical builder.
Style:
- Either a strong-opinion post (a clear take on the tech, mechanics or market cycles they follow) or a question hook serious builders will want to answer.
- One punch line, 2-4 supporting lines, end on tension or a question.
- Builder voice, technical; no beginner education, no safe takes.
Output only the post text, ready to paste. No preamble like \"Here's a post:\".";

// Per-endpoint knobs. Replies retry on empty output and get a word cap,
// suggestions are a single manual shot returned uncapped.
#[derive(Debug, Clone, Copy)]
pub struct CompletionPolicy {
    pub max_tokens: u32,
    pub temperature: f32,
    pub retry: RetryPolicy,
    pub word_cap: Option<usize>,
}

impl CompletionPolicy {
    pub const REPLY: CompletionPolicy = CompletionPolicy {
        max_tokens: 80,
        temperature: 0.85,
        retry: RetryPolicy::new(3, Duration::ZERO),
        word_cap: Some(REPLY_WORD_CAP),
    };

    pub const SUGGEST: CompletionPolicy = CompletionPolicy {
        max_tokens: 280,
        temperature: 0.8,
        retry: RetryPolicy::none(),
        word_cap: None,
    };
}

pub struct CompletionClient {
    http: reqwest::Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(http: reqwest::Client, config: CompletionConfig) -> Self {
        Self { http, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    // Generates one short reply to a post.
    pub async fn generate_reply(
        &self,
        tweet_text: &str,
        author_handle: Option<&str>,
    ) -> Result<String, AppError> {
        let user = prompt_body(tweet_text, author_handle)?;
        self.complete(REPLY_SYSTEM, user, &CompletionPolicy::REPLY).await
    }

    // Suggests one top-level post from the week's reply log.
    pub async fn suggest_post(&self, entries: &[ReplyLogEntry]) -> Result<String, AppError> {
        let user = format!(
            "Tweets I replied to this week:\n\n{}\n\nSuggest one engaging post (strong take or conversation hook) based on these themes.",
            summary_block(entries)
        );
        self.complete(SUGGEST_SYSTEM, user, &CompletionPolicy::SUGGEST).await
    }

    async fn complete(
        &self,
        system: &str,
        user: String,
        policy: &CompletionPolicy,
    ) -> Result<String, AppError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "OPENROUTER_API_KEY is not set. Add it to .env to generate text.".to_string(),
            )
        })?;

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens: policy.max_tokens,
            temperature: policy.temperature,
        };

        let text = run_until_non_empty(&policy.retry, |_| self.send_once(api_key, &request)).await?;

        Ok(match policy.word_cap {
            Some(cap) => cap_words(&text, cap),
            None => text,
        })
    }

    // One POST to /chat/completions, no retry here
    async fn send_once(&self, api_key: &str, request: &ChatRequest) -> Result<Attempt, AppError> {
        COMPLETION_ATTEMPTS.inc();
        let start = Instant::now();

        let res = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(request)
            .send()
            .await
            .map_err(AppError::CompletionRequest)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            UPSTREAM_LATENCY.observe(start.elapsed().as_secs_f64());
            UPSTREAM_ERRORS.with_label_values(&["completion"]).inc();
            let message = upstream_message(status.as_u16(), &body);
            tracing::error!(status = status.as_u16(), %message, "completion API error");
            return Err(AppError::Completion {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = res.json().await.map_err(AppError::CompletionRequest)?;
        UPSTREAM_LATENCY.observe(start.elapsed().as_secs_f64());

        let Some(choice) = body.choices.into_iter().next() else {
            return Ok(Attempt::default());
        };
        let text = choice
            .message
            .map(|m| extract_text(&m.content))
            .unwrap_or_default();

        Ok(Attempt {
            text,
            finish_reason: choice.finish_reason,
        })
    }
}

// Pulls assistant text out of a message `content`, which is either a string,
// an array of string / `{text}` parts (joined in order) or null.
pub fn extract_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.trim().to_string(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(s) => Some(s.as_str()),
                Value::Object(obj) => obj.get("text").and_then(Value::as_str),
                _ => None,
            })
            .collect::<String>()
            .trim()
            .to_string(),
        _ => String::new(),
    }
}

// error.message, then message, then the raw body
fn upstream_message(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_json = parsed.as_ref().and_then(|v| {
        v.pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| v.get("message").and_then(Value::as_str))
    });

    match from_json {
        Some(msg) if !msg.is_empty() => msg.to_string(),
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => format!("completion API error: {}", status),
    }
}

// Numbered recap of the week's replies, post text capped at 300 chars and
// reply at 200.
pub fn summary_block(entries: &[ReplyLogEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "[{}] {}\nTweet: {}\nYour reply: {}",
                i + 1,
                e.author_handle,
                take_chars(&e.tweet_text, 300),
                take_chars(&e.reply_text, 200)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
