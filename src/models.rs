use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Scraped fields can arrive as null or a non-string, treat those as empty
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

// POST /reply body
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub tweet_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub author_handle: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub reply_text: String,
}

// One entry of the weekly reply log kept by the extension
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplyLogEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub author_handle: String,
    #[serde(deserialize_with = "lenient_string")]
    pub tweet_text: String,
    #[serde(deserialize_with = "lenient_string")]
    pub reply_text: String,
}

// POST /suggest-post body
#[derive(Deserialize, Debug, Default)]
pub struct SuggestRequest {
    pub tweets: Option<Vec<ReplyLogEntry>>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponse {
    pub suggested_post: String,
}

// Post ids arrive as strings, older extension builds sent numbers
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum PostId {
    Text(String),
    Number(u64),
}

impl PostId {
    pub fn into_string(self) -> String {
        match self {
            PostId::Text(s) => s.trim().to_string(),
            PostId::Number(n) => n.to_string(),
        }
    }
}

// POST /post-reply body
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PostReplyRequest {
    pub text: Option<String>,
    pub tweet_id: Option<PostId>,
    // original post content, only logged
    pub tweet_text: Option<String>,
}

// Chat completion request (OpenRouter / OpenAI format)
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }
}

// Only the parts of a chat completion response we read
#[derive(Deserialize, Debug, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChatChoice {
    pub message: Option<ChoiceMessage>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChoiceMessage {
    // string, array of parts, or null
    #[serde(default)]
    pub content: Value,
}

// Post creation body for the X API
#[derive(Serialize, Debug)]
pub struct CreatePost<'a> {
    pub text: &'a str,
    pub reply: InReplyTo<'a>,
}

#[derive(Serialize, Debug)]
pub struct InReplyTo<'a> {
    pub in_reply_to_tweet_id: &'a str,
}
