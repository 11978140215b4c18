use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::llm::error::LlmError;
use crate::llm::parse::parse_reply;
use crate::llm::prompt::build_prompt;
use crate::post::Post;

const API_BASE: &str = "https://api.aigc369.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Full pipeline for one user action: validate, prompt, call, parse.
/// Parsing cannot fail, so every error here predates the reply text.
pub async fn generate_post(topic: &str, api_key: &str, model: &str) -> Result<Post, LlmError> {
    if topic.trim().is_empty() {
        return Err(LlmError::Input("Topic must not be empty".to_string()));
    }
    if api_key.trim().is_empty() {
        return Err(LlmError::Input("API key must not be empty".to_string()));
    }

    let prompt = build_prompt(topic);
    let raw = call_model(&prompt, api_key, model).await?;
    Ok(parse_reply(&raw))
}

/// One attempt, no retries. Returns the assistant text untouched; the
/// parser owns all cleanup.
pub async fn call_model(prompt: &str, api_key: &str, model: &str) -> Result<String, LlmError> {
    let url = format!("{API_BASE}/chat/completions");
    call_model_at(&url, prompt, api_key, model).await
}

async fn call_model_at(
    url: &str,
    prompt: &str,
    api_key: &str,
    model: &str,
) -> Result<String, LlmError> {
    let client = reqwest::Client::new();

    let request = ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: TEMPERATURE,
    };

    let reply: ChatReply = client
        .post(url)
        .bearer_auth(api_key)
        .timeout(REQUEST_TIMEOUT)
        .json(&request)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .map_err(|err| {
            if err.is_decode() {
                LlmError::MalformedReply
            } else {
                LlmError::Transport(err)
            }
        })?;

    extract_reply_text(reply)
}

fn extract_reply_text(reply: ChatReply) -> Result<String, LlmError> {
    reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(LlmError::MalformedReply)
}

/// Used by `rednote key --test` to verify a key without spending tokens.
pub async fn healthcheck_api_key(api_key: &str) -> Result<(), LlmError> {
    let client = reqwest::Client::new();
    client
        .get(format!("{API_BASE}/models"))
        .bearer_auth(api_key)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_from(json: &str) -> ChatReply {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn reply_text_comes_back_unmodified() {
        let reply = reply_from(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"  标题1: 你好 \n"}}]}"#,
        );
        assert_eq!(extract_reply_text(reply).unwrap(), "  标题1: 你好 \n");
    }

    #[test]
    fn missing_choices_is_a_malformed_reply() {
        let reply = reply_from(r#"{"id":"x"}"#);
        assert!(matches!(
            extract_reply_text(reply),
            Err(LlmError::MalformedReply)
        ));
    }

    #[test]
    fn null_content_is_a_malformed_reply() {
        let reply = reply_from(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#);
        assert!(matches!(
            extract_reply_text(reply),
            Err(LlmError::MalformedReply)
        ));
    }

    #[tokio::test]
    async fn empty_topic_is_rejected_before_any_call() {
        let err = generate_post("   ", "sk-test", DEFAULT_MODEL)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Input(_)));
    }

    #[tokio::test]
    async fn empty_api_key_is_rejected_before_any_call() {
        let err = generate_post("健康饮食", "", DEFAULT_MODEL)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Input(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // Port 9 (discard) refuses connections on any sane machine.
        let err = call_model_at("http://127.0.0.1:9/v1/chat/completions", "p", "k", "m")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Transport(_)));
    }
}
