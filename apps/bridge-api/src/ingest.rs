//! 总线订阅链路装配
//!
//! 把订阅端收到的原始报文接到 Schema 路由与存储网关上：
//! decode → route → insert。订阅路径上的失败从不向上传播，
//! 每次丢弃都记一条结构化 warn 与一次计数（没有死信存储）。

use bridge_bus::{BusSubscriber, InboundHandler, InboundMessage};
use bridge_storage::TableStore;
use bridge_telemetry::{
    record_bus_message_dropped, record_bus_message_received, record_bus_message_stored,
};
use domain::RouteContext;
use std::sync::Arc;
use tracing::{info, warn};

/// 入站消息处理器
struct IngestHandler {
    tables: Arc<dyn TableStore>,
}

#[async_trait::async_trait]
impl InboundHandler for IngestHandler {
    async fn handle(&self, message: InboundMessage) {
        record_bus_message_received();
        let (table_name, fields) = bridge_router::decode_payload(&message.payload);
        // 订阅路径没有认证用户，上下文只带来源主题
        let ctx = RouteContext::new(None, Some(message.topic.clone()));
        let record = match bridge_router::route(&table_name, &fields, &ctx) {
            Ok(record) => record,
            Err(err) => {
                record_bus_message_dropped();
                warn!(
                    target: "bridge.ingest",
                    topic = %message.topic,
                    table = %table_name,
                    error = %err,
                    "inbound_message_rejected"
                );
                return;
            }
        };

        match self.tables.insert(&record).await {
            Ok(_) => {
                record_bus_message_stored();
                info!(
                    target: "bridge.ingest",
                    topic = %message.topic,
                    table = %record.table(),
                    "inbound_message_stored"
                );
            }
            Err(err) => {
                record_bus_message_dropped();
                warn!(
                    target: "bridge.ingest",
                    topic = %message.topic,
                    table = %record.table(),
                    error = %err,
                    "inbound_message_store_failed"
                );
            }
        }
    }
}

/// 启动订阅任务
///
/// 订阅端接管共享连接的 event loop 并长驻运行；初次握手失败是
/// 终态，任务退出但进程继续提供 HTTP 服务。
pub fn spawn_ingest(
    subscriber: BusSubscriber,
    tables: Arc<dyn TableStore>,
) -> tokio::task::JoinHandle<()> {
    let handler = Arc::new(IngestHandler { tables });
    tokio::spawn(async move {
        if let Err(err) = subscriber.run(handler).await {
            warn!("bus subscriber stopped: {}", err);
        }
    })
}
