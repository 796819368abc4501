//! 身份能力：对接托管身份服务（注册、口令登录、令牌校验）。
//!
//! 令牌签发与校验完全委托给外部身份服务，本模块只做 REST 封装；
//! 进程内不缓存任何会话状态。

use async_trait::async_trait;
use serde_json::Value;

/// 身份服务错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// 令牌缺失或被身份服务拒绝。
    #[error("missing or invalid token")]
    InvalidToken,
    /// 身份服务明确拒绝（凭据错误、邮箱已注册等），携带上游给出的原因。
    #[error("{0}")]
    Provider(String),
    /// 身份服务不可达或响应不可解析。
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Unreachable(err.to_string())
    }
}

/// 身份服务返回的认证主体。
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// 身份服务分配的 subject id。
    pub id: String,
    pub email: String,
    /// 注册时存进 metadata 的 name 声明（可能缺失）。
    pub name: Option<String>,
    /// 上游返回的完整用户对象（登录响应里需要原样透出）。
    pub raw: Value,
}

/// 口令登录成功后的会话。
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: Value,
}

/// 身份服务抽象。
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 创建认证身份（name 存入用户 metadata）。
    async fn sign_up(&self, name: &str, email: &str, password: &str)
    -> Result<AuthUser, AuthError>;

    /// 口令登录，返回上游签发的 access token 与用户对象。
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// "这个令牌是谁"查询；无效令牌返回 `InvalidToken`。
    async fn user_from_token(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// Supabase 风格身份服务客户端。
pub struct SupabaseAuth {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(http: reqwest::Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }))
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            return Err(AuthError::Provider(extract_error_message(&body)));
        }
        auth_user_from_json(&body["user"], email)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            return Err(AuthError::Provider(extract_error_message(&body)));
        }
        let Some(access_token) = body["access_token"].as_str() else {
            return Err(AuthError::Unreachable(
                "login response missing access_token".to_string(),
            ));
        };
        Ok(Session {
            access_token: access_token.to_string(),
            user: body["user"].clone(),
        })
    }

    async fn user_from_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidToken);
        }
        let body: Value = response.json().await?;
        auth_user_from_json(&body, "")
    }
}

/// 从上游错误响应里提取可读原因（msg > error_description > message）。
fn extract_error_message(body: &Value) -> String {
    for key in ["msg", "error_description", "message"] {
        if let Some(message) = body.get(key).and_then(Value::as_str) {
            return message.to_string();
        }
    }
    "unknown error".to_string()
}

/// 把上游用户对象解析为 AuthUser；id 缺失视为上游响应异常。
fn auth_user_from_json(user: &Value, fallback_email: &str) -> Result<AuthUser, AuthError> {
    let Some(id) = user.get("id").and_then(Value::as_str) else {
        return Err(AuthError::Unreachable(
            "provider response missing user id".to_string(),
        ));
    };
    let email = user
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or(fallback_email)
        .to_string();
    let name = user
        .pointer("/user_metadata/name")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(AuthUser {
        id: id.to_string(),
        email,
        name,
        raw: user.clone(),
    })
}
