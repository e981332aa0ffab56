use anyhow::Result;
use clap::{Parser, Subcommand};
use reactor_app::client::{ClientCommand, ReactorClient, ResultPane};
use reactor_app::{live, server, wiring};
use reactor_common::observability::init_logging;
use reactor_config::{ReactorConfig, ReactorConfigLoader};
use reactor_runtime::{ReactorHandle, ReactorRuntime};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};

const DEFAULT_CONFIG: &str = "reactor.yaml";

#[derive(Parser)]
#[command(name = "reactor")]
#[command(about = "Claim detection, fact-check gateway and source reputation", long_about = None)]
#[command(version)]
struct Cli {
    /// YAML config file. Without it, ./reactor.yaml is used when present
    #[arg(long, short, global = true, env = "REACTOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Overrides server.bind
        #[arg(long)]
        bind: Option<String>,
    },

    /// Extract claims from stdin
    Detect {
        /// Re-run detection as lines arrive, after the configured quiet period
        #[arg(long)]
        follow: bool,
    },

    /// Interactive client for a running server
    Client {
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 120)]
        timeout: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = match &cli.config {
        Some(path) => ReactorConfigLoader::new().with_file(path),
        None => ReactorConfigLoader::new().with_optional_file(DEFAULT_CONFIG),
    };
    let config = loader.load()?;
    init_logging(wiring::log_config(&config.logging))?;

    let runtime = ReactorRuntime::build("reactor", None)?;
    let handle = runtime.handle();
    let grace = Duration::from_secs(config.server.shutdown_grace_secs);

    let outcome = runtime.block_on(run(cli.command, config, handle));
    runtime.shutdown(grace);
    outcome
}

async fn run(command: Commands, config: ReactorConfig, handle: ReactorHandle) -> Result<()> {
    let _ctrl_c = handle.cancel_on_ctrl_c();
    match command {
        Commands::Serve { bind } => serve(config, bind, &handle).await,
        Commands::Detect { follow } => detect(config, follow, &handle).await,
        Commands::Client { server, timeout } => {
            client(&server, Duration::from_secs(timeout), &handle).await
        }
    }
}

async fn serve(config: ReactorConfig, bind: Option<String>, handle: &ReactorHandle) -> Result<()> {
    let state = wiring::build_state(&config)?.shared();
    let app = server::app(state, config.server.body_limit_bytes);
    let addr = bind.unwrap_or(config.server.bind);
    let listener = server::bind(&addr).await?;
    server::serve(listener, app, handle.cancellation()).await
}

async fn detect(config: ReactorConfig, follow: bool, handle: &ReactorHandle) -> Result<()> {
    let detector = wiring::build_detector(&config.claims);
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    if follow {
        let quiet = Duration::from_millis(config.claims.debounce_ms);
        live::follow(detector, quiet, stdin, stdout, handle.cancellation()).await?;
        return Ok(());
    }

    let mut text = String::new();
    stdin.read_to_string(&mut text).await?;
    let claims = detector.detect(&text);
    let mut rendered = serde_json::to_string_pretty(&claims)?;
    rendered.push('\n');
    stdout.write_all(rendered.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

async fn client(server: &str, timeout: Duration, handle: &ReactorHandle) -> Result<()> {
    let client = ReactorClient::new(server, timeout)?;
    let mut pane = ResultPane::default();
    let mut last: Option<ClientCommand> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"Type a claim to fact-check, `search <query>`, `analyze <url>`, or `quit`.\n")
        .await?;
    stdout.flush().await?;

    loop {
        let line = tokio::select! {
            _ = handle.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };

        let command = match ClientCommand::parse(&line) {
            ClientCommand::Quit => break,
            ClientCommand::Retry => match last.clone() {
                Some(previous) => previous,
                None => continue,
            },
            other => other,
        };
        let outcome = client.send(&command).await;
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "client.request.failed");
        }
        pane.record(outcome);
        last = Some(command);

        stdout.write_all(pane.render().as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}
