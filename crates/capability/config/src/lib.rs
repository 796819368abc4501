//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP 监听地址（由 BACKEND_PORT 推导）。
    pub http_addr: String,
    /// 托管后端（身份 + 表存储）端点与匿名密钥。
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// 上游 HTTP 请求的固定超时（秒）。
    pub supabase_timeout_seconds: u64,
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub mqtt_tls: bool,
    pub mqtt_client_id: String,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| ConfigError::Missing("SUPABASE_URL".to_string()))?;
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY".to_string()))?;
        let supabase_timeout_seconds = read_u64_with_default("SUPABASE_TIMEOUT_SECONDS", 30)?;
        let backend_port = read_u16_with_default("BACKEND_PORT", 10000)?;
        let http_addr = format!("0.0.0.0:{backend_port}");
        let mqtt_host = env::var("MQTT_BROKER").unwrap_or_else(|_| "127.0.0.1".to_string());
        let mqtt_port = read_u16_with_default("MQTT_PORT", 8883)?;
        let mqtt_username = read_optional("MQTT_USERNAME");
        let mqtt_password = read_optional("MQTT_PASSWORD");
        let mqtt_tls = read_bool_with_default("MQTT_TLS", true);
        let mqtt_client_id =
            env::var("MQTT_CLIENT_ID").unwrap_or_else(|_| "bridge-backend".to_string());

        Ok(Self {
            http_addr,
            supabase_url,
            supabase_anon_key,
            supabase_timeout_seconds,
            mqtt_host,
            mqtt_port,
            mqtt_username,
            mqtt_password,
            mqtt_tls,
            mqtt_client_id,
        })
    }
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
