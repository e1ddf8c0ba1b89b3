use axum::{Router, routing::any};
use std::sync::Arc;

use crate::server::AppState;

mod ai_index;
mod auth;

pub use ai_index::AI_INDEX_ROUTE;

// 除固定路由外，其余路径也交给同一处理器（与无服务器部署下的行为一致）
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(AI_INDEX_ROUTE, any(ai_index::ai_index))
        .fallback(ai_index::ai_index)
}
