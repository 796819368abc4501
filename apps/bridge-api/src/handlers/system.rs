//! 存活探针与指标快照 handlers
//!
//! - `GET /` 与 `GET /health`：只反映进程存活，不触碰外部依赖
//! - `GET /metrics`：进程内计数器快照

use api_contract::{ApiResponse, HomeResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bridge_telemetry::metrics;

/// 根路径存活探针
pub async fn home() -> Response {
    (
        StatusCode::OK,
        Json(HomeResponse {
            message: "bridge backend is running".to_string(),
        }),
    )
        .into_response()
}

/// Liveness 探针
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// 指标快照
pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            bus_messages_received: snapshot.bus_messages_received,
            bus_messages_stored: snapshot.bus_messages_stored,
            bus_messages_dropped: snapshot.bus_messages_dropped,
            publish_requests: snapshot.publish_requests,
            publish_bus_failures: snapshot.publish_bus_failures,
            upstream_failures: snapshot.upstream_failures,
        })),
    )
        .into_response()
}
