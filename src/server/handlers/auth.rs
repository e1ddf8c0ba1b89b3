use axum::http::HeaderMap;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::server::util::tokens_match;

pub const TEAM_TOKEN_HEADER: &str = "x-team-token";

fn team_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TEAM_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
}

// 服务端未配置 TEAM_TOKEN 时同样拒绝（失败即关闭）
pub fn ensure_team_token(headers: &HeaderMap, config: &RelayConfig) -> Result<(), RelayError> {
    let Some(provided) = team_token(headers) else {
        return Err(RelayError::Unauthorized);
    };
    let Some(expected) = config.team_token() else {
        return Err(RelayError::Unauthorized);
    };
    if tokens_match(provided, expected) {
        Ok(())
    } else {
        Err(RelayError::Unauthorized)
    }
}
