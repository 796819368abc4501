//! 追踪、请求 ID 与基础计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub bus_messages_received: u64,
    pub bus_messages_stored: u64,
    pub bus_messages_dropped: u64,
    pub publish_requests: u64,
    pub publish_bus_failures: u64,
    pub upstream_failures: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    bus_messages_received: AtomicU64,
    bus_messages_stored: AtomicU64,
    bus_messages_dropped: AtomicU64,
    publish_requests: AtomicU64,
    publish_bus_failures: AtomicU64,
    upstream_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            bus_messages_received: AtomicU64::new(0),
            bus_messages_stored: AtomicU64::new(0),
            bus_messages_dropped: AtomicU64::new(0),
            publish_requests: AtomicU64::new(0),
            publish_bus_failures: AtomicU64::new(0),
            upstream_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bus_messages_received: self.bus_messages_received.load(Ordering::Relaxed),
            bus_messages_stored: self.bus_messages_stored.load(Ordering::Relaxed),
            bus_messages_dropped: self.bus_messages_dropped.load(Ordering::Relaxed),
            publish_requests: self.publish_requests.load(Ordering::Relaxed),
            publish_bus_failures: self.publish_bus_failures.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录总线入站消息次数。
pub fn record_bus_message_received() {
    metrics()
        .bus_messages_received
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录总线入站消息成功落库次数。
pub fn record_bus_message_stored() {
    metrics().bus_messages_stored.fetch_add(1, Ordering::Relaxed);
}

/// 记录总线入站消息丢弃次数（路由拒绝或落库失败）。
pub fn record_bus_message_dropped() {
    metrics()
        .bus_messages_dropped
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录 HTTP 发布请求次数。
pub fn record_publish_request() {
    metrics().publish_requests.fetch_add(1, Ordering::Relaxed);
}

/// 记录总线发布失败次数。
pub fn record_publish_bus_failure() {
    metrics()
        .publish_bus_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录上游（身份/存储）失败次数。
pub fn record_upstream_failure() {
    metrics().upstream_failures.fetch_add(1, Ordering::Relaxed);
}
