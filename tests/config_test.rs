//! Configuration file loading and validation.

mod common;

use tempfile::TempDir;
use test_log::test;
use wikigraph::{config::GraphConfig, query::TraversalOptions, WikiGraphError};

#[test]
fn test_missing_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = GraphConfig::load(temp_dir.path().join("wikigraph.toml")).unwrap();
    assert_eq!(config, GraphConfig::default());
    assert_eq!(TraversalOptions::from(&config.traversal), TraversalOptions::default());
}

#[test]
fn test_save_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("wikigraph.toml");
    let mut config = GraphConfig::default();
    config.threads = Some(2);
    config.traversal.max_depth = 3;
    config.markup.redirect_markers = vec!["#REDIRECT".to_string()];
    config.save(&path).unwrap();
    assert_eq!(GraphConfig::load(&path).unwrap(), config);
}

#[test]
fn test_partial_config_fills_defaults() {
    let config = GraphConfig::from_toml(
        r#"
normalize_unicode = false

[traversal]
max_depth = 2
"#,
    )
    .unwrap();
    assert!(!config.normalize_unicode);
    assert_eq!(config.traversal.max_depth, 2);
    assert_eq!(config.traversal.max_nodes, Some(100_000));
    assert_eq!(config.markup, GraphConfig::default().markup);
    assert_eq!(config.corpus_bucket_size, 10_000);
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("wikigraph.toml");

    std::fs::write(&path, "threads = 0\n").unwrap();
    assert!(matches!(GraphConfig::load(&path), Err(WikiGraphError::Config(_))));

    std::fs::write(&path, "corpus_bucket_size = 0\n").unwrap();
    assert!(matches!(GraphConfig::load(&path), Err(WikiGraphError::Config(_))));

    std::fs::write(&path, "normalize_unicode = \"yes\"\n").unwrap();
    assert!(matches!(GraphConfig::load(&path), Err(WikiGraphError::Config(_))));
}

#[test]
fn test_thread_pool_honors_thread_count() {
    let config = GraphConfig {
        threads: Some(2),
        ..GraphConfig::default()
    };
    let pool = config.thread_pool().unwrap();
    assert_eq!(pool.current_num_threads(), 2);
}
