//! 总线发布端。

use crate::BusError;
use rumqttc::{AsyncClient, QoS};
use serde_json::Value;
use tracing::info;

/// MQTT 发布端：QoS 1，无本地缓冲与重试队列。
///
/// 连接断开时发布立即失败并上抛给调用方。
#[derive(Clone)]
pub struct BusPublisher {
    client: AsyncClient,
}

impl BusPublisher {
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }

    /// 发布结构化 payload（确定性 JSON 文本，UTF-8）。
    pub async fn publish(&self, topic: &str, payload: &Value) -> Result<(), BusError> {
        self.publish_text(topic, payload.to_string()).await
    }

    /// 发布文本 payload。
    pub async fn publish_text(&self, topic: &str, payload: String) -> Result<(), BusError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|err| BusError::Publish(err.to_string()))?;
        info!(target: "bridge.bus", topic = %topic, "message_published");
        Ok(())
    }
}
