use thiserror::Error;

/// Failures the generation pipeline can surface. Parsing is deliberately
/// absent: a degraded reply still produces a post, so the only failure
/// sources are input validation and the network call itself.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Rejected before any network call is made.
    #[error("{0}")]
    Input(String),

    /// Network fault, timeout, or non-2xx status from the chat endpoint.
    #[error("chat completion request failed")]
    Transport(#[from] reqwest::Error),

    /// A 2xx reply whose JSON envelope carries no assistant message text.
    #[error("chat completion reply had no message content")]
    MalformedReply,
}
