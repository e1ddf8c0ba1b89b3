use chrono::{DateTime, Utc};

use crate::error::RelayError;
use crate::providers::openai::UpstreamReply;
use crate::server::util::mask_key;

// 记录上游调用结果（耗时、状态码与 token 用量），密钥只输出掩码
pub fn log_upstream_call(
    start_time: DateTime<Utc>,
    model: &str,
    api_key: &str,
    reply: &Result<UpstreamReply, RelayError>,
) {
    let response_time_ms = (Utc::now() - start_time).num_milliseconds();
    let key_hint = mask_key(api_key);

    match reply {
        Ok(reply) => {
            let usage = reply.usage().unwrap_or_default();
            tracing::info!(
                model,
                api_key = %key_hint,
                status = reply.status.as_u16(),
                response_time_ms,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "upstream chat completion finished"
            );
        }
        Err(e) => {
            tracing::error!(
                model,
                api_key = %key_hint,
                response_time_ms,
                "upstream chat completion failed: {}",
                e
            );
        }
    }
}
