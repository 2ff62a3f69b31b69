use std::fs;
use tempfile::TempDir;
use thinkboard::config::{AppConfig, ConfigManager};
use thinkboard::{Args, ChartType};

// Helper to create a temporary config directory for testing
fn setup_test_config_dir() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());
    (temp_dir, config_manager)
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.version, "0.1");

    assert_eq!(config.server.base_url, "http://localhost:5000");
    assert_eq!(config.server.timeout_secs, None);

    assert_eq!(config.display.table_cell_padding, 2);
    assert_eq!(config.display.narrow_width, 80);

    assert_eq!(config.notifications.enter_delay_ms, 100);
    assert_eq!(config.notifications.visible_ms, 3000);
    assert_eq!(config.notifications.exit_ms, 300);

    assert_eq!(config.performance.event_poll_interval_ms, 25);

    assert_eq!(config.chart.default_type, "bar");
    assert_eq!(config.default_chart_type(), ChartType::Bar);
    assert_eq!(config.chart.export_dir, None);

    assert_eq!(config.theme.colors.primary, "#dc2626");
    assert_eq!(config.theme.colors.keybind_labels, "indexed(252)");

    assert_eq!(config.query.history_limit, 1000);
    assert!(config.query.enable_history);

    assert!(!config.debug.enabled);
}

#[test]
fn test_generate_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let template = config_manager
        .generate_default_config()
        .expect("Failed to generate config");

    assert!(template.contains("[server]"));
    assert!(template.contains("[display]"));
    assert!(template.contains("[notifications]"));
    assert!(template.contains("[performance]"));
    assert!(template.contains("[chart]"));
    assert!(template.contains("[theme.colors]"));
    assert!(template.contains("[query]"));
    assert!(template.contains("[debug]"));
    assert!(template.contains("version = \"0.1\""));
}

#[test]
fn test_generated_config_parses_to_defaults() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let template = config_manager.generate_default_config().unwrap();
    let config: AppConfig = toml::from_str(&template).expect("template must parse");

    assert_eq!(config.server.base_url, AppConfig::default().server.base_url);
    assert!(config.validate().is_ok());
}

#[test]
fn test_write_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let config_path = config_manager
        .write_default_config(false)
        .expect("Failed to write config");

    assert!(config_path.exists());
    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[server]"));
    assert!(content.contains("version = \"0.1\""));
}

#[test]
fn test_write_config_without_force_fails_if_exists() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    config_manager
        .write_default_config(false)
        .expect("First write should succeed");

    let result = config_manager.write_default_config(false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("already exists"));
}

#[test]
fn test_write_config_with_force_overwrites() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let first_path = config_manager
        .write_default_config(false)
        .expect("First write should succeed");
    let second_path = config_manager
        .write_default_config(true)
        .expect("Second write with force should succeed");

    assert_eq!(first_path, second_path);
    assert!(first_path.exists());
}

#[test]
fn test_load_from_minimal_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    config_manager
        .ensure_config_dir()
        .expect("Failed to create config dir");

    let minimal_config = r#"
version = "0.1"

[server]
base_url = "http://analytics.internal:8080"
timeout_secs = 30

[chart]
default_type = "pie"
"#;
    fs::write(config_manager.config_path("config.toml"), minimal_config)
        .expect("Failed to write minimal config");

    let config = AppConfig::load_from(&config_manager).expect("Should load config");

    assert_eq!(config.server.base_url, "http://analytics.internal:8080");
    assert_eq!(config.server.timeout_secs, Some(30));
    assert_eq!(config.default_chart_type(), ChartType::Pie);
    // Unspecified sections keep their defaults
    assert_eq!(config.display.narrow_width, 80);
    assert_eq!(config.performance.event_poll_interval_ms, 25);
}

#[test]
fn test_load_from_invalid_config_reports_path() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    config_manager.ensure_config_dir().unwrap();
    fs::write(
        config_manager.config_path("config.toml"),
        "[server]\nbase_url = \"localhost:5000\"\n",
    )
    .unwrap();

    let err = AppConfig::load_from(&config_manager).unwrap_err().to_string();
    assert!(err.contains("Invalid configuration"));
    assert!(err.contains("config.toml"));
}

#[test]
fn test_load_from_missing_file_uses_defaults() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let config = AppConfig::load_from(&config_manager).expect("Should load default config");

    assert_eq!(config.version, "0.1");
    assert_eq!(config.server.base_url, "http://localhost:5000");
}

#[test]
fn test_merge_configs() {
    let mut base = AppConfig::default();
    let mut override_config = AppConfig::default();

    override_config.display.narrow_width = 100;
    override_config.notifications.visible_ms = 5000;
    override_config.theme.colors.keybind_hints = "blue".to_string();

    base.merge(override_config);

    assert_eq!(base.display.narrow_width, 100);
    assert_eq!(base.notifications.visible_ms, 5000);
    assert_eq!(base.theme.colors.keybind_hints, "blue");

    // Unmodified values remain default
    assert_eq!(base.display.table_cell_padding, 2);
    assert_eq!(base.query.history_limit, 1000);
}

#[test]
fn test_merge_does_not_override_with_defaults() {
    use thinkboard::config::DisplayConfig;

    let mut base = DisplayConfig {
        table_cell_padding: 1,
        narrow_width: 120,
    };

    base.merge(DisplayConfig::default());

    assert_eq!(base.table_cell_padding, 1);
    assert_eq!(base.narrow_width, 120);
}

#[test]
fn test_merge_option_fields() {
    use thinkboard::config::ChartConfig;

    let mut base = ChartConfig::default();
    assert_eq!(base.export_dir, None);

    base.merge(ChartConfig {
        export_dir: Some("/tmp/charts".into()),
        ..Default::default()
    });

    assert_eq!(base.export_dir, Some("/tmp/charts".into()));
    assert_eq!(base.export_width, 1024);
}

#[test]
fn test_apply_args_overrides() {
    use clap::Parser;

    let args = Args::try_parse_from([
        "thinkboard",
        "--server",
        "http://10.0.0.5:5000",
        "--timeout",
        "10",
        "--chart-type",
        "line",
        "--debug",
    ])
    .unwrap();

    let mut config = AppConfig::default();
    config.apply_args(&args);

    assert_eq!(config.server.base_url, "http://10.0.0.5:5000");
    assert_eq!(config.server.timeout_secs, Some(10));
    assert_eq!(config.default_chart_type(), ChartType::Line);
    assert!(config.debug.enabled);
}

#[test]
fn test_validate_config_valid() {
    assert!(AppConfig::default().validate().is_ok());
}

#[test]
fn test_validate_config_invalid_version() {
    let config = AppConfig {
        version: "1.0".to_string(),
        ..Default::default()
    };

    let result = config.validate();
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Unsupported config version"));
}

#[test]
fn test_validate_config_bad_base_url() {
    let mut config = AppConfig::default();
    config.server.base_url = "ftp://example.com".to_string();

    assert!(config
        .validate()
        .unwrap_err()
        .to_string()
        .contains("server.base_url must start with http:// or https://"));
}

#[test]
fn test_validate_config_zero_event_poll_interval() {
    let mut config = AppConfig::default();
    config.performance.event_poll_interval_ms = 0;

    assert!(config
        .validate()
        .unwrap_err()
        .to_string()
        .contains("event_poll_interval_ms must be greater than 0"));
}

#[test]
fn test_validate_config_notification_timing() {
    let mut config = AppConfig::default();
    config.notifications.visible_ms = 50;

    assert!(config
        .validate()
        .unwrap_err()
        .to_string()
        .contains("must be greater than enter_delay_ms"));
}

#[test]
fn test_validate_config_chart_type() {
    let mut config = AppConfig::default();
    config.chart.default_type = "scatter".to_string();

    assert!(config
        .validate()
        .unwrap_err()
        .to_string()
        .contains("Invalid chart.default_type"));
}

#[test]
fn test_validate_config_bad_color() {
    std::env::remove_var("NO_COLOR");
    let mut config = AppConfig::default();
    config.theme.colors.primary = "not_a_color".to_string();

    assert!(config
        .validate()
        .unwrap_err()
        .to_string()
        .contains("Invalid color value for 'primary'"));
}
