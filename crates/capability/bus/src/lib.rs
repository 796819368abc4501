//! 总线能力：MQTT 连接、发布端与通配符订阅端。
//!
//! 发布与订阅共享同一条连接：`connect` 产出一对
//! `(AsyncClient, EventLoop)`，发布端克隆 client，
//! 订阅端接管 event loop 并负责驱动它。

pub mod publisher;
pub mod subscriber;

pub use publisher::BusPublisher;
pub use subscriber::{BusSubscriber, InboundHandler, InboundMessage};

// connect 的返回类型是 rumqttc 的原生类型，一并导出
pub use rumqttc::{AsyncClient, EventLoop};

use rumqttc::{MqttOptions, TlsConfiguration, Transport};
use std::time::Duration;

/// 总线错误。
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("mqtt publish failed: {0}")]
    Publish(String),
    #[error("mqtt subscribe failed: {0}")]
    Subscribe(String),
    #[error("mqtt connection failed: {0}")]
    Connection(String),
}

/// 总线连接配置。
#[derive(Debug, Clone)]
pub struct BusConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// 托管 broker 通常走 8883 + TLS（系统根证书）。
    pub tls: bool,
    pub client_id: String,
}

/// 建立进程级唯一的 MQTT 连接。
///
/// 连接是惰性的：真正的握手发生在 event loop 首次被轮询时。
pub fn connect(config: &BusConfig) -> (AsyncClient, EventLoop) {
    // AsyncClient::new 不触网，仅构造请求通道。
    AsyncClient::new(mqtt_options(config), 64)
}

fn mqtt_options(config: &BusConfig) -> MqttOptions {
    let mut options = MqttOptions::new(config.client_id.clone(), config.host.clone(), config.port);
    options.set_keep_alive(Duration::from_secs(60));
    if let (Some(username), Some(password)) = (config.username.as_ref(), config.password.as_ref())
    {
        options.set_credentials(username, password);
    }
    if config.tls {
        options.set_transport(Transport::Tls(TlsConfiguration::Native));
    }
    options
}
