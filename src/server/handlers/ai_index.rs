use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::error::RelayError;
use crate::server::AppState;
use crate::server::handlers::auth::ensure_team_token;
use crate::server::relay_request::{
    build_completion_request, is_truthy, parse_body, read_body, text_of,
};
use crate::server::request_logging::log_upstream_call;

pub const AI_INDEX_ROUTE: &str = "/api/ai-index";

const UPSTREAM_FALLBACK_ERROR: &str = "OpenAI error";

pub async fn ai_index(
    State(app_state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, RelayError> {
    match method {
        // 预检请求：CORS 头由中间件附加
        Method::OPTIONS => Ok(StatusCode::OK.into_response()),
        Method::GET => Ok(Json(json!({ "ok": true, "route": AI_INDEX_ROUTE })).into_response()),
        Method::POST => relay(&app_state, &headers, body).await,
        _ => Err(RelayError::MethodNotAllowed),
    }
}

// 请求体只在鉴权通过后读取；GET/OPTIONS/其他方法不受体积上限影响
async fn relay(
    app_state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> Result<Response, RelayError> {
    ensure_team_token(headers, &app_state.relay)?;

    let body = parse_body(&read_body(body).await?)?;

    // 只有 JSON 解析失败会先于密钥检查返回
    let Some(api_key) = app_state.relay.openai_api_key() else {
        return Err(RelayError::ServerMisconfigured("OPENAI_API_KEY"));
    };

    let request = build_completion_request(&body, &app_state.relay)?;

    let start_time = Utc::now();
    let reply = app_state.upstream.chat_completions(api_key, &request).await;
    log_upstream_call(start_time, &request.model, api_key, &reply);
    let reply = reply?;

    if !reply.status.is_success() {
        return Err(RelayError::Upstream {
            status: reply.status,
            message: upstream_error_message(&reply.body),
        });
    }

    // 原样转发上游 JSON 字节
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        reply.raw,
    )
        .into_response())
}

fn upstream_error_message(body: &Value) -> String {
    body.get("error")
        .and_then(|e| e.get("message"))
        .filter(|m| is_truthy(m))
        .map(text_of)
        .unwrap_or_else(|| UPSTREAM_FALLBACK_ERROR.to_string())
}
