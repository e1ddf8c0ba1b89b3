use std::future::Future;
use std::pin::Pin;

use crate::error::RelayError;
use crate::providers::openai::{ChatCompletionRequest, UpstreamReply};
use crate::providers::OpenAIProvider;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// 上游补全接口抽象（OpenAI 兼容实现；测试中可替换为假实现）
pub trait ChatUpstream: Send + Sync {
    fn chat_completions<'a>(
        &'a self,
        api_key: &'a str,
        request: &'a ChatCompletionRequest,
    ) -> BoxFuture<'a, Result<UpstreamReply, RelayError>>;
}

impl ChatUpstream for OpenAIProvider {
    fn chat_completions<'a>(
        &'a self,
        api_key: &'a str,
        request: &'a ChatCompletionRequest,
    ) -> BoxFuture<'a, Result<UpstreamReply, RelayError>> {
        Box::pin(async move { OpenAIProvider::chat_completions(self, api_key, request).await })
    }
}
