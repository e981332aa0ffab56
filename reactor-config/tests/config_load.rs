use reactor_claims::OverlapPolicy;
use reactor_common::observability::LogFormat;
use reactor_config::{ReactorConfig, ReactorConfigLoader, Transport};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn file_overrides_merge_with_defaults() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
server:
  bind: "0.0.0.0:8080"
logging:
  format: json
gateway:
  temp_dir: /var/tmp/reactor
  page_analysis:
    timeout_secs: 45
  search:
    transport: http
    endpoint: "https://analyzers.example.org/search"
    bearer_token: "${SEARCH_TOKEN}"
claims:
  overlap: keep_all
  status_thresholds:
    verified: 0.95
reputation:
  dashboard_split:
    questionable: 0.4
"#;
    let p = write_yaml(&tmp, "reactor.yaml", file_yaml);

    let config = temp_env::with_var("SEARCH_TOKEN", Some("tok-123"), || {
        ReactorConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config")
    });

    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.server.shutdown_grace_secs, 10);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.gateway.temp_dir, PathBuf::from("/var/tmp/reactor"));

    let page = &config.gateway.page_analysis;
    assert_eq!(page.timeout_secs, Some(45));
    assert_eq!(page.program, "python");
    assert_eq!(page.args, ["AI-Agent/PageAnalyzer.py"]);

    let search = &config.gateway.search;
    assert_eq!(search.transport, Transport::Http);
    assert_eq!(search.bearer_token.as_deref(), Some("tok-123"));

    assert_eq!(config.claims.overlap, OverlapPolicy::KeepAll);
    assert_eq!(config.claims.status_thresholds.verified, 0.95);
    assert_eq!(config.claims.status_thresholds.disputed, 0.8);
    assert_eq!(config.reputation.dashboard_split.questionable, 0.4);
    assert_eq!(config.reputation.dashboard_split.trusted, 0.7);
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "reactor.yaml", "server:\n  bind: \"127.0.0.1:4000\"\n");

    let config = temp_env::with_vars(
        [
            ("REACTOR__SERVER__BIND", Some("127.0.0.1:5000")),
            ("REACTOR__GATEWAY__FACT_CHECK__TIMEOUT_SECS", Some("90")),
            ("REACTOR__CLAIMS__MAX_CLAIMS", Some("5")),
        ],
        || ReactorConfigLoader::new().with_file(&p).load().expect("load config"),
    );

    assert_eq!(config.server.bind, "127.0.0.1:5000");
    assert_eq!(config.gateway.fact_check.timeout_secs, Some(90));
    assert!(config.gateway.fact_check.use_results_log);
    assert_eq!(config.claims.max_claims, 5);
}

#[test]
#[serial]
fn missing_optional_file_is_fine() {
    let tmp = TempDir::new().unwrap();
    let config = ReactorConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults only");
    assert_eq!(config, ReactorConfig::default());
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(
        ReactorConfigLoader::new()
            .with_file(tmp.path().join("absent.yaml"))
            .load()
            .is_err()
    );
}

#[test]
#[serial]
fn rejects_unordered_thresholds() {
    let err = ReactorConfigLoader::new()
        .with_yaml_str("reputation:\n  trust_thresholds:\n    reliable: 0.95\n")
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("trust"));
}

#[test]
#[serial]
fn http_transport_without_endpoint_is_rejected() {
    let result = ReactorConfigLoader::new()
        .with_yaml_str("gateway:\n  page_analysis:\n    transport: http\n")
        .load();
    assert!(result.is_err());
}
