use std::fs;
use std::path::{Path, PathBuf};
use tizi::logging::{LoggingConfig, init};

// 注意: 全局订阅器只能初始化一次, 涉及 init() 的测试合并为一个并标记 #[ignore]

/// 获取测试专用的日志目录
fn test_log_dir(test_name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tizi_test_logs_{}_{}", test_name, std::process::id()))
}

/// 滚动文件按 UTC 日期命名
fn today_log_path(log_dir: &Path, prefix: &str) -> PathBuf {
    let today = chrono::Utc::now().date_naive();
    log_dir.join(format!("{}.{}.log", prefix, today.format("%Y-%m-%d")))
}

#[test]
#[ignore] // 需要单独运行: cargo test --test logging_system -- --ignored
fn test_logging_captures_library_diagnostics() {
    let log_dir = test_log_dir("init").join("nested");
    let _ = fs::remove_dir_all(&log_dir);

    let config = LoggingConfig {
        level: "info,tizi_ladder=debug".to_string(),
        directory: log_dir.to_string_lossy().to_string(),
        file_prefix: "ladder-test".to_string(),
        console_level: "off".to_string(),
        retention_days: 7,
        compress_history: false,
    };
    init(config.clone()).expect("日志初始化失败");
    assert!(log_dir.exists(), "嵌套日志目录应该被创建");

    // 第二次初始化应返回错误而不是 panic
    assert!(init(config).is_err());

    tracing::info!("阶梯计算开始_INFO_MSG");
    tracing::debug!("根模块调试日志_DEBUG_MSG");
    let specs = tizi::ladder::LadderInputs::default().compute();
    assert!(specs.is_ok());

    std::thread::sleep(std::time::Duration::from_millis(300));

    let log_file = today_log_path(&log_dir, "ladder-test");
    let content = fs::read_to_string(&log_file)
        .unwrap_or_else(|e| panic!("读取日志文件失败: {:?}, 错误: {}", log_file, e));

    assert!(content.contains("阶梯计算开始_INFO_MSG"));
    assert!(content.contains("INFO"));
    // tizi_ladder 的 log 记录经桥接写入文件
    assert!(content.contains("计算得到 5 个梯级"), "文件内容:\n{}", content);
    // 根模块只记录 info 及以上
    assert!(!content.contains("根模块调试日志_DEBUG_MSG"));

    let _ = fs::remove_dir_all(test_log_dir("init"));
}

#[test]
fn test_logging_config_from_json() {
    let config: LoggingConfig = serde_json::from_str(
        r#"{"level": "info", "directory": "logs", "file_prefix": "tizi", "retention_days": 14}"#,
    )
    .expect("解析日志配置失败");

    assert_eq!(config.retention_days, 14);
    assert!(config.compress_history, "默认应该开启压缩");
    assert_eq!(config.console_level, "warn");
}

#[test]
fn test_logging_config_default_roundtrip() {
    let config = LoggingConfig::default();
    let text = serde_json::to_string(&config).expect("序列化日志配置失败");
    let back: LoggingConfig = serde_json::from_str(&text).expect("解析日志配置失败");
    assert_eq!(back, config);
    assert_eq!(back.file_prefix, "tizi");
}

#[test]
fn test_housekeep_on_fresh_directory() {
    let temp_dir = tempfile::TempDir::new().expect("创建临时目录失败");
    let config = LoggingConfig {
        directory: temp_dir.path().to_string_lossy().to_string(),
        ..LoggingConfig::default()
    };
    let report = tizi::logging::housekeep(&config).expect("日志整理失败");
    assert!(report.removed.is_empty());
    assert!(report.compressed.is_empty());
}
