//! 稳定的 DTO 与 API 响应契约。
//!
//! 成功响应使用各端点约定的具体形状（status/message/...），
//! 失败响应统一走 `ApiResponse` 错误封装（code + message）。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 失败响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 登录请求体。
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录响应体：access_token 与用户对象均来自身份服务，原样透出。
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    pub access_token: String,
    pub user: Value,
}

/// 注册请求体。
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 注册响应体。
///
/// status 为 "success" 或 "partial_success"（认证身份已建、profile 未建，
/// 客户端可稍后走 /create-profile 补建）。
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: String,
    pub message: String,
    pub user: ProfileDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// profile（users 表行）返回结构。
#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// 建档响应体：status 为 "success" 或 "already_exists"。
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub status: String,
    pub message: String,
    pub user: ProfileDto,
}

/// 发布请求体。
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub topic: String,
    pub table_name: String,
    /// 要保存的原始字段集（JSON 对象）。
    pub data: Value,
}

/// 发布响应体。
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub status: String,
    pub saved_to: String,
    pub mqtt_topic: String,
    /// 存储端回写的行（含服务端分配的主键与插入时间）。
    pub saved_data: Value,
    /// 发起请求的用户邮箱。
    pub user: String,
}

/// 存活探针响应体。
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub message: String,
}

/// 指标快照返回结构。
#[derive(Debug, Serialize)]
pub struct MetricsSnapshotDto {
    pub bus_messages_received: u64,
    pub bus_messages_stored: u64,
    pub bus_messages_dropped: u64,
    pub publish_requests: u64,
    pub publish_bus_failures: u64,
    pub upstream_failures: u64,
}
