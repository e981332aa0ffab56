//! Subprocess analyzer.
//!
//! One OS process per request. The input is passed as the final argument,
//! except image payloads which go through a temporary file and
//! `--file <path>`. stdout must be a single JSON document; stderr is kept for
//! error reports.

use crate::analyzer::Analyzer;
use crate::error::GatewayError;
use crate::fallback;
use crate::request::{AnalysisInput, AnalysisRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Environment variable carrying the request id into the analyzer process.
pub const REQUEST_ID_ENV: &str = "REACTOR_REQUEST_ID";

/// How to launch one analyzer.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: PathBuf,
    /// Leading arguments, typically the script path.
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    /// `None` waits for as long as the process runs.
    pub timeout: Option<Duration>,
    /// Log consulted when stdout is not valid JSON. `None` disables the fallback.
    pub results_log: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: Vec::new(),
            timeout: None,
            results_log: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn results_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_log = Some(path.into());
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

pub struct ProcessAnalyzer {
    name: String,
    spec: CommandSpec,
    temp_dir: PathBuf,
}

impl ProcessAnalyzer {
    pub fn new(name: impl Into<String>, spec: CommandSpec, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            spec,
            temp_dir: temp_dir.into(),
        }
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    async fn write_payload(&self, data: &str) -> Result<NamedTempFile, GatewayError> {
        tokio::fs::create_dir_all(&self.temp_dir).await?;
        let file = tempfile::Builder::new()
            .prefix("temp_image_")
            .suffix(".txt")
            .tempfile_in(&self.temp_dir)?;
        tokio::fs::write(file.path(), data).await?;
        Ok(file)
    }

    fn arguments(&self, input: &AnalysisInput, payload: Option<&Path>) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.spec.args.iter().map(OsString::from).collect();
        match payload {
            Some(path) => {
                args.push("--file".into());
                args.push(path.as_os_str().to_owned());
            }
            None => args.push(input.as_str().into()),
        }
        args
    }

    async fn run(
        &self,
        request: &AnalysisRequest,
        args: Vec<OsString>,
    ) -> Result<Value, GatewayError> {
        let mut cmd = Command::new(&self.spec.program);
        cmd.args(&args)
            .envs(self.spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .env(REQUEST_ID_ENV, request.id.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.spec.working_dir {
            cmd.current_dir(dir);
        }

        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|source| {
            tracing::warn!(
                analyzer = %self.name,
                request_id = %request.id,
                program = %self.spec.program.display(),
                error = %source,
                "gateway.process.spawn_failed"
            );
            GatewayError::Spawn {
                program: self.spec.program.display().to_string(),
                source,
            }
        })?;
        tracing::debug!(
            analyzer = %self.name,
            request_id = %request.id,
            kind = %request.kind,
            pid = ?child.id(),
            timeout_ms = ?self.spec.timeout.map(|t| t.as_millis() as u64),
            "gateway.process.spawned"
        );

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = match self.spec.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    let pid = child.id();
                    // kill() also reaps, so the pid is gone once this returns
                    if let Err(e) = child.kill().await {
                        tracing::warn!(analyzer = %self.name, ?pid, error = %e, "gateway.process.kill_failed");
                    }
                    for capture in [stdout, stderr].into_iter().flatten() {
                        capture.task.abort();
                    }
                    tracing::warn!(
                        analyzer = %self.name,
                        request_id = %request.id,
                        ?pid,
                        timeout_ms = limit.as_millis() as u64,
                        "gateway.process.timeout"
                    );
                    return Err(GatewayError::Timeout { after: limit });
                }
            },
            None => child.wait().await?,
        };

        let stdout = collect(stdout, &self.name).await;
        let stderr = collect(stderr, &self.name).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).into_owned();
            tracing::warn!(
                analyzer = %self.name,
                request_id = %request.id,
                code = ?status.code(),
                elapsed_ms,
                stderr = %snip(&stderr),
                "gateway.process.nonzero_exit"
            );
            return Err(GatewayError::NonZeroExit {
                code: status.code(),
                stderr,
            });
        }

        tracing::debug!(
            analyzer = %self.name,
            request_id = %request.id,
            elapsed_ms,
            stdout_len = stdout.len(),
            "gateway.process.exited"
        );

        let raw = String::from_utf8_lossy(&stdout).into_owned();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => Ok(value),
            Err(parse) => self.fall_back(request, parse, raw).await,
        }
    }

    async fn fall_back(
        &self,
        request: &AnalysisRequest,
        parse: serde_json::Error,
        raw_output: String,
    ) -> Result<Value, GatewayError> {
        let Some(log) = &self.spec.results_log else {
            tracing::warn!(analyzer = %self.name, request_id = %request.id, error = %parse, "gateway.parse.failed");
            return Err(GatewayError::Parse {
                parse_error: parse.to_string(),
                fallback_error: None,
                raw_output,
            });
        };

        match fallback::lookup(log, request.id).await {
            Ok(value) => {
                tracing::info!(
                    analyzer = %self.name,
                    request_id = %request.id,
                    log = %log.display(),
                    error = %parse,
                    "gateway.parse.fallback_hit"
                );
                Ok(value)
            }
            Err(fallback) => {
                tracing::warn!(
                    analyzer = %self.name,
                    request_id = %request.id,
                    error = %parse,
                    fallback_error = %fallback,
                    "gateway.parse.failed"
                );
                Err(GatewayError::Parse {
                    parse_error: parse.to_string(),
                    fallback_error: Some(fallback.to_string()),
                    raw_output,
                })
            }
        }
    }
}

#[async_trait]
impl Analyzer for ProcessAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, GatewayError> {
        // Held for the whole call; dropping it removes the file on every exit path.
        let payload = match &request.input {
            AnalysisInput::Image(data) => Some(self.write_payload(data).await?),
            _ => None,
        };
        let args = self.arguments(&request.input, payload.as_ref().map(|f| f.path()));
        let outcome = self.run(request, args).await;

        if let Some(file) = payload {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                tracing::warn!(path = %path.display(), error = %e, "gateway.payload.cleanup_failed");
            }
        }
        outcome
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// How long to keep reading a pipe after the analyzer exits. A background
/// child that inherited stdout would otherwise hold the request open.
const PIPE_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Output captured from one pipe; the buffer survives an aborted reader.
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

fn drain<R>(mut pipe: R) -> Capture
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buf = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buf);
    let task = tokio::spawn(async move {
        let mut chunk = [0u8; 8192];
        // a read error just truncates what we captured
        while let Ok(n @ 1..) = pipe.read(&mut chunk).await {
            lock(&sink).extend_from_slice(&chunk[..n]);
        }
    });
    Capture { buf, task }
}

async fn collect(capture: Option<Capture>, analyzer: &str) -> Vec<u8> {
    let Some(mut capture) = capture else {
        return Vec::new();
    };
    if tokio::time::timeout(PIPE_DRAIN_GRACE, &mut capture.task)
        .await
        .is_err()
    {
        capture.task.abort();
        tracing::warn!(
            analyzer,
            grace_ms = PIPE_DRAIN_GRACE.as_millis() as u64,
            "gateway.process.pipe_held_open"
        );
    }
    std::mem::take(&mut *lock(&capture.buf))
}

fn lock(buf: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buf.lock().unwrap_or_else(PoisonError::into_inner)
}

fn snip(s: &str) -> &str {
    let mut end = s.len().min(500);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_goes_last_and_image_goes_through_file() {
        let spec = CommandSpec::new("python").arg("agent.py");
        let analyzer = ProcessAnalyzer::new("fact_check", spec, "data");

        let text = AnalysisInput::Text("Cats are mammals.".into());
        assert_eq!(
            analyzer.arguments(&text, None),
            vec![OsString::from("agent.py"), OsString::from("Cats are mammals.")]
        );

        let image = AnalysisInput::Image("data:image/png;base64,AAAA".into());
        let args = analyzer.arguments(&image, Some(Path::new("/tmp/temp_image_1.txt")));
        assert_eq!(
            args,
            vec![
                OsString::from("agent.py"),
                OsString::from("--file"),
                OsString::from("/tmp/temp_image_1.txt")
            ]
        );
    }

    #[test]
    fn snip_respects_char_boundaries() {
        let s = "é".repeat(400);
        let cut = snip(&s);
        assert!(cut.len() <= 500);
        assert!(s.starts_with(cut));
    }
}
