//! Integration tests for salesboard-config crate.

use chrono::NaiveDate;
use salesboard_config::{Config, ConfigCache, ConfigLoader};
use std::io::Write;

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_load_toml_with_partial_sections() {
    let file = write_config(
        ".toml",
        r#"
[store]
pool_size = 3

[reports]
default_start_date = "2022-07-01"
user_report_limit = 25
"#,
    );

    let config = ConfigLoader::new(file.path()).load().unwrap();
    assert_eq!(config.store.pool_size, 3);
    assert_eq!(config.store.acquire_timeout_ms, 5_000);
    assert_eq!(
        config.reports.default_start_date,
        NaiveDate::from_ymd_opt(2022, 7, 1).unwrap()
    );
    assert_eq!(config.reports.user_report_limit, 25);
    assert_eq!(config.reports.default_interval, "month");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_load_yaml() {
    let file = write_config(
        ".yaml",
        "store:\n  dataset_path: data/sales.json\nlogging:\n  level: debug\n  json: true\n",
    );

    let config = ConfigLoader::new(file.path()).load().unwrap();
    assert_eq!(
        config.store.dataset_path.as_deref(),
        Some(std::path::Path::new("data/sales.json"))
    );
    assert!(config.logging.json);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_invalid_values_fail_validation() {
    let file = write_config(".toml", "[reports]\ndefault_interval = \"decade\"\n");
    assert!(ConfigLoader::new(file.path()).load().is_err());

    let file = write_config(".toml", "[store]\npool_size = \"ten\"\n");
    assert!(ConfigLoader::new(file.path()).load().is_err());
}

#[test]
fn test_config_cache_reload_from_file() {
    let file = write_config(".toml", "[reports]\nuser_report_limit = 4\n");
    let loader = ConfigLoader::new(file.path());
    let cache = ConfigCache::new(loader.load().unwrap());
    let first = cache.get();
    assert_eq!(first.reports.user_report_limit, 4);

    std::fs::write(file.path(), "[reports]\nuser_report_limit = 40\n").unwrap();
    cache.reload(&loader).unwrap();

    assert_eq!(cache.get().reports.user_report_limit, 40);
    assert_eq!(first.reports.user_report_limit, 4);

    std::fs::write(file.path(), "[store]\npool_size = 0\n").unwrap();
    assert!(cache.reload(&loader).is_err());
    assert_eq!(cache.get().reports.user_report_limit, 40);
}
