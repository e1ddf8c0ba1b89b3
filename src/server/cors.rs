use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};

pub const ALLOW_HEADERS: &str = "content-type, x-team-token";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

// 浏览器从 file:// 页面发起请求时 Origin 为字面量 "null"；缺省时按同样处理
const MISSING_ORIGIN: &str = "null";

/// Cross-origin policy built from the `ALLOWED_ORIGINS` setting.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_all: bool,
    allowed: Vec<String>,
}

impl CorsPolicy {
    pub fn from_config(raw: &str) -> Self {
        let allowed: Vec<String> = raw.split(',').map(|s| s.trim().to_string()).collect();
        let allow_all = allowed.iter().any(|o| o == "*");
        Self { allow_all, allowed }
    }

    /// Value for `Access-Control-Allow-Origin`, or `None` to omit the header.
    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        if self.allow_all {
            return Some(HeaderValue::from_static("*"));
        }

        let origin = match origin {
            Some(v) => v.to_str().ok()?,
            None => MISSING_ORIGIN,
        };

        if self.allowed.iter().any(|o| o == origin) {
            HeaderValue::from_str(origin).ok()
        } else {
            None
        }
    }

    pub fn apply(&self, origin: Option<&HeaderValue>, response_headers: &mut HeaderMap) {
        response_headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        match self.allow_origin(origin) {
            Some(origin) => {
                response_headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            }
            None => {
                response_headers.remove(header::ACCESS_CONTROL_ALLOW_ORIGIN);
            }
        }
        response_headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        response_headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
    }
}

// 所有响应（包括框架自身生成的拒绝响应）统一附加 CORS 头
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();
    let mut response = next.run(request).await;
    policy.apply(origin.as_ref(), response.headers_mut());
    response
}
