//! HTTP 响应辅助函数和 DTO 转换
//!
//! 失败响应统一走 `ApiResponse` 封装（code + message）；
//! 成功响应由各 handler 按端点约定的具体形状构造。
//!
//! 错误码与状态码对应：
//! - AUTH.UNAUTHORIZED (401)：令牌缺失或无效
//! - AUTH.FORBIDDEN (403)：已认证但未建档
//! - VALIDATION.FAILED (400)：请求体或路由校验失败
//! - UPSTREAM.REJECTED (400)：身份服务明确拒绝
//! - UPSTREAM.ERROR (500)：身份/存储服务失败或不可达
//! - TRANSPORT.ERROR (500)：总线发布失败

use api_contract::{ApiResponse, ProfileDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bridge_storage::StorageError;
use bridge_telemetry::record_upstream_failure;
use domain::UserProfile;

/// 认证错误响应
pub fn auth_error() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "missing or invalid token",
        )),
    )
        .into_response()
}

/// 禁止访问错误响应
pub fn forbidden_error() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error(
            "AUTH.FORBIDDEN",
            "user not registered in system",
        )),
    )
        .into_response()
}

/// 校验失败响应
pub fn validation_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("VALIDATION.FAILED", message.into())),
    )
        .into_response()
}

/// 身份服务明确拒绝响应（凭据错误、邮箱已注册等）
pub fn provider_rejected(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("UPSTREAM.REJECTED", message.into())),
    )
        .into_response()
}

/// 上游（身份/存储）失败响应
pub fn upstream_error(message: impl Into<String>) -> Response {
    record_upstream_failure();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("UPSTREAM.ERROR", message.into())),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    upstream_error(err.to_string())
}

/// 总线发布失败响应
pub fn transport_error(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("TRANSPORT.ERROR", message.into())),
    )
        .into_response()
}

/// UserProfile 转 ProfileDto
pub fn profile_to_dto(profile: UserProfile) -> ProfileDto {
    ProfileDto {
        id: profile.id,
        name: profile.name,
        email: profile.email,
    }
}
