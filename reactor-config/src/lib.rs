//! Loader for Reactor configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning key by key:
//!
//! 1. built-in defaults ([`DEFAULTS_YAML`])
//! 2. config files and inline YAML, in the order they were added
//! 3. `REACTOR__`-prefixed environment variables, `__` separating path
//!    segments (`REACTOR__GATEWAY__PAGE_ANALYSIS__TIMEOUT_SECS=45`)
//!
//! String values may reference environment variables as `$VAR` or `${VAR}`;
//! they are expanded after merging, recursively up to a fixed depth.
use config::{Config, ConfigError, Environment, File, FileFormat};
use reactor_claims::{OverlapPolicy, StatusThresholds};
use reactor_common::observability::LogFormat;
use reactor_reputation::{DashboardSplit, TrustThresholds};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const ENV_PREFIX: &str = "REACTOR";

/// Defaults layered beneath every other source so that partial overrides
/// keep the remaining keys of a section.
pub const DEFAULTS_YAML: &str = r#"
server:
  bind: "127.0.0.1:3000"
  body_limit_bytes: 16777216
  shutdown_grace_secs: 10
logging:
  format: text
  stderr: true
  filter: info
gateway:
  temp_dir: data
  results_log: data/results.json
  fact_check:
    transport: process
    program: venv/bin/python
    args: ["AI-Agent/WebAgent.py"]
    use_results_log: true
  search:
    transport: process
    program: venv/bin/python
    args: ["AI-Agent/GoogleSearchAgent.py"]
  page_analysis:
    transport: process
    program: python
    args: ["AI-Agent/PageAnalyzer.py"]
    timeout_secs: 30
claims:
  max_claims: 10
  debounce_ms: 1500
  overlap: longest_wins
"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gateway: GatewayConfig,
    pub claims: ClaimsConfig,
    pub reputation: ReputationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Form bodies carry base64 images, hence the generous cap.
    pub body_limit_bytes: usize,
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".into(),
            body_limit_bytes: 16 * 1024 * 1024,
            shutdown_grace_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Falls back to `REACTOR_LOG_DIR`, then `~/.local/share/reactor`.
    pub dir: Option<PathBuf>,
    pub stderr: bool,
    /// Used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            dir: None,
            stderr: true,
            filter: "info".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Where image payloads are staged.
    pub temp_dir: PathBuf,
    /// Shared results log used by analyzers with `use_results_log`.
    pub results_log: Option<PathBuf>,
    /// Working directory for analyzer processes; the server's own when unset.
    pub working_dir: Option<PathBuf>,
    pub fact_check: AnalyzerConfig,
    pub search: AnalyzerConfig,
    pub page_analysis: AnalyzerConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from("data"),
            results_log: Some(PathBuf::from("data/results.json")),
            working_dir: None,
            fact_check: AnalyzerConfig {
                use_results_log: true,
                ..AnalyzerConfig::process("venv/bin/python", "AI-Agent/WebAgent.py")
            },
            search: AnalyzerConfig::process("venv/bin/python", "AI-Agent/GoogleSearchAgent.py"),
            page_analysis: AnalyzerConfig {
                timeout_secs: Some(30),
                ..AnalyzerConfig::process("python", "AI-Agent/PageAnalyzer.py")
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Process,
    Http,
}

/// One analyzer. `program`/`args`/`env`/`use_results_log` apply to the
/// process transport, `endpoint`/`bearer_token` to the HTTP one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub transport: Transport,
    pub program: String,
    pub args: Vec<String>,
    /// Extra variables for the process as `NAME=value`.
    pub env: Vec<String>,
    /// No timeout when unset.
    pub timeout_secs: Option<u64>,
    pub use_results_log: bool,
    pub endpoint: Option<String>,
    pub bearer_token: Option<String>,
}

impl AnalyzerConfig {
    fn process(program: &str, script: &str) -> Self {
        Self {
            program: program.into(),
            args: vec![script.into()],
            ..Self::default()
        }
    }

    /// `env` entries split at the first `=`.
    pub fn env_pairs(&self) -> Result<Vec<(String, String)>, ConfigError> {
        self.env
            .iter()
            .map(|entry| {
                entry
                    .split_once('=')
                    .filter(|(name, _)| !name.is_empty())
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .ok_or_else(|| {
                        ConfigError::Message(format!("analyzer env entry {entry:?} is not NAME=value"))
                    })
            })
            .collect()
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        self.env_pairs()?;
        match self.transport {
            Transport::Process if self.program.trim().is_empty() => Err(ConfigError::Message(
                format!("gateway.{name}.program is required for the process transport"),
            )),
            Transport::Http if self.endpoint.as_deref().is_none_or(|e| e.trim().is_empty()) => {
                Err(ConfigError::Message(format!(
                    "gateway.{name}.endpoint is required for the http transport"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsConfig {
    pub max_claims: usize,
    pub debounce_ms: u64,
    pub overlap: OverlapPolicy,
    pub status_thresholds: StatusThresholds,
    /// Fixes the random scorer's seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            max_claims: 10,
            debounce_ms: 1500,
            overlap: OverlapPolicy::LongestWins,
            status_thresholds: StatusThresholds::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    pub trust_thresholds: TrustThresholds,
    pub dashboard_split: DashboardSplit,
}

impl ReactorConfig {
    /// Cross-field checks the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |e: &dyn std::fmt::Display| ConfigError::Message(e.to_string());
        self.gateway.fact_check.validate("fact_check")?;
        self.gateway.search.validate("search")?;
        self.gateway.page_analysis.validate("page_analysis")?;
        self.claims
            .status_thresholds
            .validate()
            .map_err(|e| invalid(&e))?;
        self.reputation
            .trust_thresholds
            .validate()
            .map_err(|e| invalid(&e))?;
        self.reputation
            .dashboard_split
            .validate()
            .map_err(|e| invalid(&e))?;
        if self.claims.max_claims == 0 {
            return Err(ConfigError::Message("claims.max_claims must be at least 1".into()));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring.
pub struct ReactorConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ReactorConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ReactorConfigLoader {
    /// Start from the built-in defaults.
    ///
    /// ```
    /// use reactor_config::{ReactorConfig, ReactorConfigLoader};
    ///
    /// let config = ReactorConfigLoader::new().load().expect("defaults are valid");
    /// assert_eq!(config, ReactorConfig::default());
    /// assert_eq!(config.gateway.page_analysis.timeout_secs, Some(30));
    /// assert_eq!(config.gateway.fact_check.timeout_secs, None);
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(File::from_str(DEFAULTS_YAML, FileFormat::Yaml));
        Self { builder }
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, for deployments configured purely
    /// through the environment.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use reactor_config::{ReactorConfigLoader, Transport};
    ///
    /// let cfg = ReactorConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// gateway:
    ///   search:
    ///     transport: http
    ///     endpoint: "https://analyzers.example.org/search"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.gateway.search.transport, Transport::Http);
    /// // untouched keys keep their defaults
    /// assert_eq!(cfg.gateway.search.args, ["AI-Agent/GoogleSearchAgent.py"]);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders and deserialize.
    ///
    /// ```
    /// use reactor_config::ReactorConfigLoader;
    ///
    /// unsafe { std::env::set_var("ANALYZER_TOKEN", "injected-from-env"); }
    ///
    /// let config = ReactorConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// gateway:
    ///   fact_check:
    ///     transport: http
    ///     endpoint: "https://analyzers.example.org/fact-check"
    ///     bearer_token: "${ANALYZER_TOKEN}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(
    ///     config.gateway.fact_check.bearer_token.as_deref(),
    ///     Some("injected-from-env")
    /// );
    ///
    /// unsafe { std::env::remove_var("ANALYZER_TOKEN"); }
    /// ```
    pub fn load(self) -> Result<ReactorConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ReactorConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}
