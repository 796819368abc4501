//! 认证中间件与请求上下文
//!
//! 提供以下中间件和辅助函数：
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - bearer_token：从 Authorization 头提取 Bearer token
//! - require_auth_user：向身份服务确认令牌有效并取回认证主体
//! - require_registered_user：在认证之上再要求 users 表有对应 profile
//!
//! 认证与授权是两层：令牌有效（认证）允许访问 /create-profile，
//! 建档完成（授权）才允许访问 /publish。

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use bridge_identity::{AuthError, AuthUser};
use bridge_telemetry::new_request_ids;
use tracing::{Instrument, info_span};

use crate::AppState;
use crate::utils::response::{auth_error, forbidden_error, storage_error, upstream_error};

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str.strip_prefix("Bearer ")
}

/// 校验令牌并取回认证主体
///
/// 令牌缺失或被身份服务拒绝返回 401；身份服务不可达返回 500。
pub async fn require_auth_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthUser, Response> {
    let token = match bearer_token(headers) {
        Some(token) => token,
        None => return Err(auth_error()),
    };
    match state.identity.user_from_token(token).await {
        Ok(user) => Ok(user),
        Err(AuthError::InvalidToken) => Err(auth_error()),
        Err(err) => Err(upstream_error(err.to_string())),
    }
}

/// 校验令牌并要求 users 表存在对应 profile（按邮箱匹配）
///
/// 已认证但未建档返回 403，引导客户端先走 POST /create-profile。
pub async fn require_registered_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthUser, Response> {
    let user = require_auth_user(state, headers).await?;
    match state.profiles.find_by_email(&user.email).await {
        Ok(Some(_)) => Ok(user),
        Ok(None) => Err(forbidden_error()),
        Err(err) => Err(storage_error(err)),
    }
}
