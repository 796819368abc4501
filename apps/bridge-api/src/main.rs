//! 桥接后端入口：HTTP 门面与总线订阅链路的装配。

mod handlers;
mod ingest;
mod middleware;
mod routes;
mod utils;

use bridge_bus::{BusConfig, BusPublisher, BusSubscriber};
use bridge_config::AppConfig;
use bridge_identity::{IdentityProvider, SupabaseAuth};
use bridge_storage::{ProfileStore, SupabaseTables, TableStore};
use bridge_telemetry::init_tracing;
use std::sync::Arc;
use std::time::Duration;

/// 应用状态：各能力以 trait 对象注入，测试可整体替换为内存实现。
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub tables: Arc<dyn TableStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub bus: BusPublisher,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 上游 REST 客户端：进程级单例，固定请求超时
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.supabase_timeout_seconds))
        .build()?;
    let identity: Arc<dyn IdentityProvider> = Arc::new(SupabaseAuth::new(
        http.clone(),
        &config.supabase_url,
        &config.supabase_anon_key,
    ));
    let supabase = Arc::new(SupabaseTables::new(
        http,
        &config.supabase_url,
        &config.supabase_anon_key,
    ));
    let tables: Arc<dyn TableStore> = supabase.clone();
    let profiles: Arc<dyn ProfileStore> = supabase;

    // 总线：发布端与订阅端共享同一条连接，订阅任务负责驱动 event loop
    let (client, eventloop) = bridge_bus::connect(&BusConfig {
        host: config.mqtt_host.clone(),
        port: config.mqtt_port,
        username: config.mqtt_username.clone(),
        password: config.mqtt_password.clone(),
        tls: config.mqtt_tls,
        client_id: config.mqtt_client_id.clone(),
    });
    let bus = BusPublisher::new(client.clone());
    // 订阅任务失败只记录，不影响 HTTP 服务
    let _subscriber_task =
        ingest::spawn_ingest(BusSubscriber::new(client, eventloop), tables.clone());

    let state = AppState {
        identity,
        tables,
        profiles,
        bus,
    };
    let app = routes::create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(axum::middleware::from_fn(middleware::request_context));

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(addr = %config.http_addr, "http server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
