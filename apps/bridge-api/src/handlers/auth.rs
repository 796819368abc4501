//! 认证相关 handlers：登录、注册、建档
//!
//! ## 提供的端点
//!
//! ### 公开端点（无需认证）
//! - `POST /login` - 口令登录，透出身份服务签发的 access token 与用户对象
//! - `POST /register` - 注册：先建认证身份，再插入 users 表 profile 行
//!
//! ### 私有端点（需 Bearer token 认证）
//! - `POST /create-profile` - 为当前令牌对应的身份补建 profile（幂等）
//!
//! ## 注册的两步语义
//!
//! 注册跨越两个上游系统：身份服务（认证身份）与表存储（users 行）。
//! 第一步失败整个注册失败；第一步成功而第二步失败时返回 HTTP 200 的
//! `partial_success`，客户端此时已能登录，稍后调用 /create-profile
//! 即可补齐 profile。没有补偿事务，不回滚已建的认证身份。

use crate::AppState;
use crate::middleware::require_auth_user;
use crate::utils::response::{
    profile_to_dto, provider_rejected, storage_error, upstream_error,
};
use api_contract::{
    LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, RegisterResponse,
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bridge_identity::AuthError;
use domain::UserProfile;
use tracing::warn;

/// 登录接口
///
/// 把口令转交身份服务换取 access token；用户对象原样透出。
///
/// # Errors
///
/// - `400 BAD REQUEST`: 身份服务拒绝（凭据错误等），message 来自上游
/// - `500 INTERNAL SERVER ERROR`: 身份服务不可达或响应不可解析
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.identity.sign_in(&req.email, &req.password).await {
        Ok(session) => {
            let response = LoginResponse {
                status: "success".to_string(),
                message: "login successful".to_string(),
                access_token: session.access_token,
                user: session.user,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(AuthError::Provider(message)) => provider_rejected(message),
        Err(err) => upstream_error(err.to_string()),
    }
}

/// 注册接口
///
/// 第一步在身份服务创建认证身份（name 存入 metadata），第二步向
/// users 表插入 profile 行。第二步失败不视为整体失败，见模块文档。
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let user = match state
        .identity
        .sign_up(&req.name, &req.email, &req.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::Provider(message)) => return provider_rejected(message),
        Err(err) => return upstream_error(err.to_string()),
    };

    let profile = UserProfile {
        id: user.id.clone(),
        name: req.name.clone(),
        email: user.email.clone(),
    };
    match state.profiles.create(&profile).await {
        Ok(created) => (
            StatusCode::OK,
            Json(RegisterResponse {
                status: "success".to_string(),
                message: "registration successful".to_string(),
                user: profile_to_dto(created),
                note: None,
            }),
        )
            .into_response(),
        // 认证身份已建而 profile 落库失败：部分成功，客户端稍后补建
        Err(err) => {
            warn!(
                target: "bridge.auth",
                email = %profile.email,
                error = %err,
                "profile_insert_failed_after_signup"
            );
            (
                StatusCode::OK,
                Json(RegisterResponse {
                    status: "partial_success".to_string(),
                    message: "auth identity created but profile creation failed".to_string(),
                    user: profile_to_dto(profile),
                    note: Some(
                        "login and call POST /create-profile to finish registration".to_string(),
                    ),
                }),
            )
                .into_response()
        }
    }
}

/// 建档接口（幂等）
///
/// 只要求令牌有效：注册收到 partial_success 的客户端靠这里补建
/// profile。profile 已存在时返回 `already_exists` 且不做任何修改。
pub async fn create_profile(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = match require_auth_user(&state, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    match state.profiles.find_by_id(&user.id).await {
        Ok(Some(existing)) => (
            StatusCode::OK,
            Json(ProfileResponse {
                status: "already_exists".to_string(),
                message: "profile already exists".to_string(),
                user: profile_to_dto(existing),
            }),
        )
            .into_response(),
        Ok(None) => {
            // name 优先取注册时存入 metadata 的声明，缺失时退回邮箱局部名
            let name = user.name.clone().unwrap_or_else(|| local_part(&user.email));
            let profile = UserProfile {
                id: user.id.clone(),
                name,
                email: user.email.clone(),
            };
            match state.profiles.create(&profile).await {
                Ok(created) => (
                    StatusCode::OK,
                    Json(ProfileResponse {
                        status: "success".to_string(),
                        message: "profile created".to_string(),
                        user: profile_to_dto(created),
                    }),
                )
                    .into_response(),
                Err(err) => storage_error(err),
            }
        }
        Err(err) => storage_error(err),
    }
}

/// 邮箱的局部名（@ 之前的部分）
fn local_part(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
