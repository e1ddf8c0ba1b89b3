pub mod client;
pub mod types;

pub use client::OpenAIProvider;
pub use types::{ChatCompletionRequest, Message, UpstreamReply, Usage};
