//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查
//! - /api/qr/generate       POST  生成二维码图像

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .fallback(handlers::not_found)
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/ping",
            get(handlers::ping).fallback(handlers::method_not_allowed),
        )
        .nest("/qr", qr_routes())
}

/// QR 路由
fn qr_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/generate",
        post(handlers::generate_qr).fallback(handlers::method_not_allowed),
    )
}
