//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! - 存活与观测：GET /、GET /health、GET /metrics
//! - 认证与建档：POST /login、POST /register、POST /create-profile
//! - 数据发布：POST /publish

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/create-profile", post(create_profile))
        .route("/publish", post(publish))
}
