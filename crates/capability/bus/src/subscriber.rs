//! 总线订阅端：通配符订阅与入站消息分发。

use crate::BusError;
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, Packet, QoS};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 订阅全部主题的通配符过滤器。
const WILDCARD_FILTER: &str = "#";

/// 重连前的退避间隔。
const RECONNECT_BACKOFF: Duration = Duration::from_secs(5);

/// 总线入站消息。
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// 入站消息处理器。
///
/// 订阅路径的失败从不向上传播：处理器自行记录并丢弃，
/// 这里不提供返回错误的通道。
#[async_trait]
pub trait InboundHandler: Send + Sync {
    async fn handle(&self, message: InboundMessage);
}

/// 长驻订阅端：disconnected → connected → subscribed。
///
/// 持有共享连接的 event loop，顺带驱动发布端的出站流量。
pub struct BusSubscriber {
    client: AsyncClient,
    eventloop: EventLoop,
}

impl BusSubscriber {
    pub fn new(client: AsyncClient, eventloop: EventLoop) -> Self {
        Self { client, eventloop }
    }

    /// 运行订阅循环，逐条（按到达顺序）交给处理器。
    ///
    /// 初次握手失败直接返回错误（终态）；连上过一次之后的断线
    /// 只记录并退避，由 event loop 自动重连，每次 ConnAck 重新
    /// 订阅（broker 侧幂等，不会重复注册处理器）。
    pub async fn run(mut self, handler: Arc<dyn InboundHandler>) -> Result<(), BusError> {
        let mut connected_once = false;
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    connected_once = true;
                    self.client
                        .subscribe(WILDCARD_FILTER, QoS::AtLeastOnce)
                        .await
                        .map_err(|err| BusError::Subscribe(err.to_string()))?;
                    info!(target: "bridge.bus", filter = WILDCARD_FILTER, "bus_subscribed");
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    handler
                        .handle(InboundMessage {
                            topic: publish.topic.clone(),
                            payload: publish.payload.to_vec(),
                        })
                        .await;
                }
                Ok(_) => {}
                Err(err) if !connected_once => {
                    return Err(BusError::Connection(err.to_string()));
                }
                Err(err) => {
                    warn!(target: "bridge.bus", error = %err, "bus_connection_lost");
                    tokio::time::sleep(RECONNECT_BACKOFF).await;
                }
            }
        }
    }
}
