//! Turn a loaded [`ReactorConfig`] into live components.

use crate::state::AppState;
use anyhow::{Context, Result};
use reactor_claims::{ClaimDetector, RandomScorer};
use reactor_common::observability::LogConfig;
use reactor_config::{AnalyzerConfig, ClaimsConfig, GatewayConfig, LoggingConfig, ReactorConfig, Transport};
use reactor_gateway::{Analyzer, CommandSpec, Gateway, HttpAnalyzer, ProcessAnalyzer};
use std::sync::Arc;
use std::time::Duration;

pub fn log_config(logging: &LoggingConfig) -> LogConfig {
    LogConfig {
        app_name: "reactor",
        log_dir: logging.dir.clone(),
        emit_stderr: logging.stderr,
        format: logging.format,
        default_filter: logging.filter.clone(),
    }
}

pub fn build_detector(claims: &ClaimsConfig) -> ClaimDetector {
    let scorer = match claims.seed {
        Some(seed) => RandomScorer::seeded(seed, claims.status_thresholds),
        None => RandomScorer::new(claims.status_thresholds),
    };
    ClaimDetector::new(Arc::new(scorer))
        .with_max_claims(claims.max_claims)
        .with_overlap(claims.overlap)
}

fn build_analyzer(
    name: &str,
    analyzer: &AnalyzerConfig,
    gateway: &GatewayConfig,
) -> Result<Arc<dyn Analyzer>> {
    let timeout = analyzer.timeout_secs.map(Duration::from_secs);
    match analyzer.transport {
        Transport::Process => {
            let mut spec = CommandSpec::new(&analyzer.program);
            spec.args = analyzer.args.clone();
            spec.env = analyzer
                .env_pairs()
                .with_context(|| format!("gateway.{name}.env"))?;
            spec.timeout = timeout;
            spec.working_dir = gateway.working_dir.clone();
            if analyzer.use_results_log {
                spec.results_log = gateway.results_log.clone();
            }
            tracing::debug!(
                analyzer = name,
                program = %analyzer.program,
                timeout_secs = ?analyzer.timeout_secs,
                results_log = spec.results_log.is_some(),
                "wiring.analyzer.process"
            );
            Ok(Arc::new(ProcessAnalyzer::new(name, spec, &gateway.temp_dir)))
        }
        Transport::Http => {
            let endpoint = analyzer
                .endpoint
                .as_deref()
                .with_context(|| format!("gateway.{name}.endpoint is not set"))?;
            let mut http = HttpAnalyzer::new(name, endpoint)?;
            if let Some(timeout) = timeout {
                http = http.with_timeout(timeout);
            }
            if let Some(token) = analyzer.bearer_token.as_deref() {
                http = http.with_bearer(token)?;
            }
            tracing::debug!(analyzer = name, endpoint = %http.endpoint(), "wiring.analyzer.http");
            Ok(Arc::new(http))
        }
    }
}

pub fn build_gateway(gateway: &GatewayConfig) -> Result<Gateway> {
    Ok(Gateway::new(
        build_analyzer("fact_check", &gateway.fact_check, gateway)?,
        build_analyzer("search", &gateway.search, gateway)?,
        build_analyzer("page_analysis", &gateway.page_analysis, gateway)?,
    ))
}

pub fn build_state(config: &ReactorConfig) -> Result<AppState> {
    let gateway = build_gateway(&config.gateway)?;
    let detector = build_detector(&config.claims);
    Ok(AppState::new(gateway, detector).with_reputation(
        config.reputation.trust_thresholds,
        config.reputation.dashboard_split,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reactor_config::ReactorConfigLoader;

    #[test]
    fn default_config_wires_process_analyzers() {
        let state = build_state(&ReactorConfig::default()).unwrap();
        assert_eq!(state.gateway.analyzer(reactor_gateway::AnalysisKind::Search).name(), "search");
        assert_eq!(state.detector.max_claims(), 10);
    }

    #[test]
    fn http_transport_is_wired_from_yaml() {
        let config = ReactorConfigLoader::new()
            .with_yaml_str(
                "gateway:\n  search:\n    transport: http\n    endpoint: \"http://127.0.0.1:9/search\"\n    timeout_secs: 5\n",
            )
            .load()
            .unwrap();
        let gateway = build_gateway(&config.gateway).unwrap();
        assert_eq!(
            gateway.analyzer(reactor_gateway::AnalysisKind::Search).name(),
            "search"
        );
    }

    #[test]
    fn bad_endpoint_fails_wiring() {
        let mut config = ReactorConfig::default();
        config.gateway.page_analysis.transport = Transport::Http;
        config.gateway.page_analysis.endpoint = Some("not a url".into());
        assert!(build_gateway(&config.gateway).is_err());
    }

    #[test]
    fn seeded_detector_is_reproducible() {
        let claims = ClaimsConfig {
            seed: Some(11),
            ..ClaimsConfig::default()
        };
        let text = "Experts say the bridge will never close.";
        assert_eq!(
            build_detector(&claims).detect(text),
            build_detector(&claims).detect(text)
        );
    }
}
