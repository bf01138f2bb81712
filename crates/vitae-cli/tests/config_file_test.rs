use std::io::Write;

use vitae_cli::config::{BackendKind, Config};

#[test]
fn test_from_file_reads_toml() {
    let path = std::env::temp_dir().join(format!("vitae-config-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[store]
backend = "memory"

[session]
history_limit = 4
request_timeout_secs = 15
event_buffer = 32

[logging]
level = "warn"
format = "json"
"#
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.store.backend, BackendKind::Memory);
    assert_eq!(config.session.history_limit, 4);
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.generation.max_tokens, 65536);
}

#[test]
fn test_shipped_defaults_parse() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default.toml");
    let config = Config::from_file(path).unwrap();

    assert_eq!(config.store.backend, BackendKind::Memory);
    assert_eq!(config.session.history_limit, 10);
    assert!(config.validate().is_ok());
}
