//! External Analysis Gateway.
//!
//! Fact checks, web searches and page analyses are delegated to opaque
//! analyzers behind the [`Analyzer`] trait:
//!
//! - [`ProcessAnalyzer`]: one OS process per request, optional timeout with
//!   forced kill, image payloads through a temporary file, stdout parsed as
//!   JSON with a results-log fallback keyed by request id
//! - [`HttpAnalyzer`]: the same request posted as JSON to an endpoint
//!
//! [`Gateway`] validates input (invalid input never reaches an analyzer) and
//! routes each [`AnalysisRequest`] by kind.
//!
//! ```no_run
//! # async fn demo() -> Result<(), reactor_gateway::GatewayError> {
//! use std::sync::Arc;
//! use std::time::Duration;
//! use reactor_gateway::{CommandSpec, Gateway, ProcessAnalyzer};
//!
//! let python = |script: &str| CommandSpec::new("venv/bin/python").arg(script);
//! let gateway = Gateway::new(
//!     Arc::new(ProcessAnalyzer::new("fact_check", python("AI-Agent/WebAgent.py"), "data")),
//!     Arc::new(ProcessAnalyzer::new("search", python("AI-Agent/GoogleSearchAgent.py"), "data")),
//!     Arc::new(ProcessAnalyzer::new(
//!         "page_analysis",
//!         python("AI-Agent/PageAnalyzer.py").timeout(Duration::from_secs(30)),
//!         "data",
//!     )),
//! );
//! let verdict = gateway.fact_check("The Great Wall is visible from space.").await?;
//! println!("{verdict}");
//! # Ok(()) }
//! ```

pub mod analyzer;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod http;
pub mod process;
pub mod request;
pub mod result;

pub use analyzer::Analyzer;
pub use error::{ErrorClass, GatewayError};
pub use fallback::{FallbackError, REQUEST_ID_KEY};
pub use gateway::Gateway;
pub use http::HttpAnalyzer;
pub use process::{CommandSpec, ProcessAnalyzer, REQUEST_ID_ENV};
pub use request::{AnalysisInput, AnalysisKind, AnalysisRequest, IMAGE_DATA_PREFIX};
pub use result::AnalysisResult;
