//! Tests for loading configuration files and registering their plugins

use std::io::Write;

use tempfile::NamedTempFile;

use dashplane::config::Config;
use dashplane::plugins::{PluginKind, Plugins};

const CONFIG: &str = r#"
server:
  host: 127.0.0.1
  port: 18080
logging:
  level: debug
  format: json
plugins:
  elasticsearch:
    - name: es1
      displayName: Elasticsearch
      description: Application logs
      address: http://localhost:9200
      username: elastic
      password: changeme
    - name: es2
      address: http://localhost:9201/
      token: abc
  github:
    - name: github
      displayName: GitHub
      organization: my-org
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_and_register() {
    let file = write_config(CONFIG);
    let config = Config::load(file.path(), None, None).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 18080);
    assert_eq!(config.server.timeout, 30);
    assert_eq!(config.logging.as_ref().unwrap().format, "json");

    let plugins = Plugins::register(&config.plugins).unwrap();
    assert_eq!(plugins.instance_count(PluginKind::Elasticsearch), 2);
    assert_eq!(plugins.instance_count(PluginKind::Github), 1);

    let names: Vec<&str> = plugins
        .catalog()
        .entries()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["es1", "es2", "github"]);
    assert_eq!(plugins.catalog().by_type(PluginKind::Github).count(), 1);
}

#[test]
fn test_cli_overrides_file() {
    let file = write_config(CONFIG);
    let config = Config::load(file.path(), Some("localhost".to_string()), Some(9000)).unwrap();

    assert_eq!(config.server.host, "localhost");
    assert_eq!(config.server.port, 9000);
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(dir.path().join("missing.yaml"), None, Some(9001)).unwrap();

    assert_eq!(config.server.port, 9001);
    assert_eq!(config.plugins.instance_count(), 0);
}

#[test]
fn test_invalid_yaml_is_rejected() {
    let file = write_config("plugins: [not, a, map");
    let err = Config::load(file.path(), None, None).unwrap_err();

    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_invalid_instance_is_rejected() {
    let file = write_config(
        r#"
plugins:
  github:
    - name: github
      organization: ""
"#,
    );
    let err = Config::load(file.path(), None, None).unwrap_err();

    assert!(err.to_string().contains("plugins.github[0]"));
}

#[test]
fn test_every_invalid_instance_is_reported() {
    let file = write_config(
        r#"
plugins:
  elasticsearch:
    - name: broken
      address: not a url
    - name: es1
      address: http://localhost:9200
    - name: also-broken
      address: ""
"#,
    );
    let message = Config::load(file.path(), None, None).unwrap_err().to_string();

    assert!(message.contains("'broken'"), "{}", message);
    assert!(message.contains("'also-broken'"), "{}", message);
    assert!(!message.contains("'es1'"), "{}", message);
}
