//! 数据发布 handler
//!
//! `POST /publish`：认证 + 建档校验 → Schema 路由 → 总线发布 → 落库，
//! 任一步失败立即短路。总线发布成功而落库失败时返回 500，已发布的
//! 报文不撤回，也没有补偿动作。

use crate::AppState;
use crate::middleware::require_registered_user;
use crate::utils::response::{storage_error, transport_error, validation_error};
use api_contract::{PublishRequest, PublishResponse};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bridge_telemetry::{record_publish_bus_failure, record_publish_request};
use domain::RouteContext;
use serde_json::Value;

/// 发布接口
///
/// # Errors
///
/// - `401 UNAUTHORIZED`: 令牌缺失或无效
/// - `403 FORBIDDEN`: 已认证但 users 表无对应 profile
/// - `400 BAD REQUEST`: data 不是 JSON 对象，或路由拒绝（未知表、
///   缺字段、字段非数值、users 表直写）
/// - `500 INTERNAL SERVER ERROR`: 总线发布失败或存储插入失败
pub async fn publish(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PublishRequest>,
) -> Response {
    record_publish_request();
    let user = match require_registered_user(&state, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let Some(fields) = req.data.as_object() else {
        return validation_error("field 'data' must be a JSON object");
    };

    // HTTP 发布路径与总线订阅路径共用同一套路由规则
    let ctx = RouteContext::new(Some(user.email.clone()), Some(req.topic.clone()));
    let record = match bridge_router::route(&req.table_name, fields, &ctx) {
        Ok(record) => record,
        Err(err) => return validation_error(err.to_string()),
    };

    let row = match serde_json::to_value(&record) {
        Ok(row) => row,
        Err(err) => return validation_error(format!("record serialization failed: {err}")),
    };

    // 总线报文带上 table_name，订阅端按同一套规则解码回来
    let mut message = row.as_object().cloned().unwrap_or_default();
    message.insert(
        "table_name".to_string(),
        Value::String(req.table_name.clone()),
    );
    if let Err(err) = state.bus.publish(&req.topic, &Value::Object(message)).await {
        record_publish_bus_failure();
        return transport_error(err.to_string());
    }

    match state.tables.insert(&record).await {
        Ok(saved) => (
            StatusCode::OK,
            Json(PublishResponse {
                status: "success".to_string(),
                saved_to: record.table().as_str().to_string(),
                mqtt_topic: req.topic,
                saved_data: saved,
                user: user.email,
            }),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppState;
    use bridge_bus::{BusConfig, BusPublisher};
    use bridge_identity::{AuthError, AuthUser, IdentityProvider, Session};
    use bridge_storage::{InMemoryTables, ProfileStore, TableStore};
    use bytes::Bytes;
    use domain::{TableKind, UserProfile};
    use http_body_util::BodyExt;
    use serde_json::json;
    use std::sync::Arc;

    struct FixedIdentity {
        user: AuthUser,
    }

    #[async_trait::async_trait]
    impl IdentityProvider for FixedIdentity {
        async fn sign_up(
            &self,
            _name: &str,
            _email: &str,
            _password: &str,
        ) -> Result<AuthUser, AuthError> {
            Ok(self.user.clone())
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, AuthError> {
            Ok(Session {
                access_token: "token-1".to_string(),
                user: self.user.raw.clone(),
            })
        }

        async fn user_from_token(&self, token: &str) -> Result<AuthUser, AuthError> {
            if token == "token-1" {
                Ok(self.user.clone())
            } else {
                Err(AuthError::InvalidToken)
            }
        }
    }

    fn test_state(tables: Arc<InMemoryTables>) -> (AppState, bridge_bus::EventLoop) {
        let (client, eventloop) = bridge_bus::connect(&BusConfig {
            host: "127.0.0.1".to_string(),
            port: 1883,
            username: None,
            password: None,
            tls: false,
            client_id: "bridge-test".to_string(),
        });
        let user = AuthUser {
            id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            name: Some("Alice".to_string()),
            raw: json!({ "id": "u1", "email": "alice@example.com" }),
        };
        let state = AppState {
            identity: Arc::new(FixedIdentity { user }),
            tables: tables.clone() as Arc<dyn TableStore>,
            profiles: tables as Arc<dyn ProfileStore>,
            bus: BusPublisher::new(client),
        };
        (state, eventloop)
    }

    async fn seed_profile(tables: &Arc<InMemoryTables>) {
        let profile = UserProfile {
            id: "u1".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        };
        tables.create(&profile).await.expect("seed profile");
    }

    fn bearer_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_static("Bearer token-1"),
        );
        headers
    }

    fn publish_request(table_name: &str, data: serde_json::Value) -> PublishRequest {
        PublishRequest {
            topic: "pet/feeder".to_string(),
            table_name: table_name.to_string(),
            data,
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes: Bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn publish_without_token_is_rejected_before_storage() {
        let tables = Arc::new(InMemoryTables::new());
        let (state, _eventloop) = test_state(tables.clone());
        let response = publish(
            State(state),
            HeaderMap::new(),
            Json(publish_request("values", json!({ "data": 3.5 }))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(tables.total_rows(), 0);
    }

    #[tokio::test]
    async fn publish_without_profile_is_forbidden() {
        let tables = Arc::new(InMemoryTables::new());
        let (state, _eventloop) = test_state(tables.clone());
        let response = publish(
            State(state),
            bearer_headers(),
            Json(publish_request("values", json!({ "data": 3.5 }))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(tables.total_rows(), 0);
    }

    #[tokio::test]
    async fn publish_routes_and_stores_record() {
        let tables = Arc::new(InMemoryTables::new());
        seed_profile(&tables).await;
        let (state, _eventloop) = test_state(tables.clone());
        let response = publish(
            State(state),
            bearer_headers(),
            Json(publish_request("values", json!({ "data": 3.5 }))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["saved_to"], "values");
        assert_eq!(body["mqtt_topic"], "pet/feeder");
        assert_eq!(body["user"], "alice@example.com");
        // 存储端回写的行带服务端分配的主键
        assert!(body["saved_data"]["id"].is_number());
        assert_eq!(tables.rows(TableKind::Values).len(), 1);
    }

    #[tokio::test]
    async fn publish_fills_history_defaults_from_context() {
        let tables = Arc::new(InMemoryTables::new());
        seed_profile(&tables).await;
        let (state, _eventloop) = test_state(tables.clone());
        let response = publish(
            State(state),
            bearer_headers(),
            Json(publish_request("history", json!({ "value": 7 }))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let rows = tables.rows(TableKind::History);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["performer"], "alice@example.com");
        assert!(rows[0]["date"].as_str().is_some());
    }

    #[tokio::test]
    async fn publish_to_users_table_is_rejected() {
        let tables = Arc::new(InMemoryTables::new());
        seed_profile(&tables).await;
        let (state, _eventloop) = test_state(tables.clone());
        let response = publish(
            State(state),
            bearer_headers(),
            Json(publish_request("users", json!({ "id": "u2" }))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        // 种子 profile 之外不允许新增 users 行
        assert_eq!(tables.rows(TableKind::Users).len(), 1);
    }

    #[tokio::test]
    async fn publish_rejects_non_object_data() {
        let tables = Arc::new(InMemoryTables::new());
        seed_profile(&tables).await;
        let (state, _eventloop) = test_state(tables.clone());
        let response = publish(
            State(state),
            bearer_headers(),
            Json(publish_request("values", json!([1, 2, 3]))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(tables.rows(TableKind::Values).len(), 0);
    }
}
