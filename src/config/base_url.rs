use reqwest::Url;

use crate::error::RelayError;

/// 校验上游 base URL：
/// - 仅允许 http/https
/// - 禁止 userinfo（凭据只走 Authorization 头）
/// - 必须带 host
pub fn validate_base_url(raw: &str) -> Result<Url, RelayError> {
    let url = Url::parse(raw.trim())
        .map_err(|_| RelayError::Config(format!("OPENAI_BASE_URL is not a valid URL: {raw}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(RelayError::Config(format!(
                "OPENAI_BASE_URL must use http or https, got {other}"
            )));
        }
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(RelayError::Config(
            "OPENAI_BASE_URL must not embed credentials".into(),
        ));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(RelayError::Config("OPENAI_BASE_URL has no host".into()));
    }

    Ok(url)
}

// OpenAI 兼容：base_url=...（追加 /v1/chat/completions）或 base_url=.../v1（追加 /chat/completions）
pub fn chat_completions_url(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{}/chat/completions", base)
    } else {
        format!("{}/v1/chat/completions", base)
    }
}
