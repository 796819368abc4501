use bridge_config::{AppConfig, ConfigError};

// 环境变量是进程级共享状态，两个场景放在同一个用例里顺序执行。
#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var/remove_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::remove_var("SUPABASE_URL");
        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");
    }
    match AppConfig::from_env() {
        Err(ConfigError::Missing(key)) => assert_eq!(key, "SUPABASE_URL"),
        other => panic!("expected missing SUPABASE_URL, got {other:?}"),
    }

    unsafe {
        std::env::set_var("SUPABASE_URL", "https://project.supabase.co");
        std::env::set_var("BACKEND_PORT", "10001");
        std::env::set_var("MQTT_BROKER", "broker.example.com");
        std::env::set_var("MQTT_PORT", "8883");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "0.0.0.0:10001");
    assert_eq!(config.supabase_url, "https://project.supabase.co");
    assert_eq!(config.supabase_anon_key, "anon-key");
    assert_eq!(config.mqtt_host, "broker.example.com");
    assert_eq!(config.mqtt_port, 8883);
    assert!(config.mqtt_tls);
    assert_eq!(config.supabase_timeout_seconds, 30);
}
