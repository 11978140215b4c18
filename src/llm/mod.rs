pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod secrets;

pub use client::{DEFAULT_MODEL, call_model, generate_post, healthcheck_api_key};
pub use error::LlmError;
pub use parse::parse_reply;
pub use prompt::build_prompt;
pub use secrets::{API_KEY_ENV, clear_api_key, ensure_api_key, lookup_api_key, store_api_key};
