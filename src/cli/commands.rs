//! CLI command implementations
//!
//! Boot sequence shared by `serve` and `run`:
//! 1. Configuration load
//! 2. Snapshot restore (when `state_file` is set)
//! 3. Request handling
//!
//! Any boot failure ends the command before a request is read.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::ApiHandler;
use crate::controller::{DrawService, LuckyDraw};
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{log_event, log_event_with_fields, Event, LogOutput, Logger};
use crate::pool::RngSampler;
use crate::store::SnapshotStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_json};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Host for `serve` (default "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for `serve` (default 54321)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed browser origins for `serve`
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Snapshot file; state is restored at boot and saved after each change
    #[serde(default)]
    pub state_file: Option<PathBuf>,

    /// Fixed RNG seed for reproducible draws
    #[serde(default)]
    pub seed: Option<u64>,

    /// Largest candidate list accepted by a load
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_host() -> String {
    HttpServerConfig::default().host
}

fn default_port() -> u16 {
    HttpServerConfig::default().port
}

fn default_cors_origins() -> Vec<String> {
    HttpServerConfig::default().cors_origins
}

fn default_max_candidates() -> usize {
    crate::controller::DEFAULT_MAX_CANDIDATES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            state_file: None,
            seed: None,
            max_candidates: default_max_candidates(),
        }
    }
}

impl Config {
    /// Load configuration from file; defaults when no path is given
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let config = match path {
            None => Config::default(),
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    CliError::config_error(format!("Failed to read config: {}", e))
                })?;
                serde_json::from_str(&content)
                    .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        self.http_config()
            .validate()
            .map_err(CliError::config_error)?;

        if self.max_candidates == 0 {
            return Err(CliError::config_error("max_candidates must be > 0"));
        }

        Ok(())
    }

    /// Server part of the configuration
    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }

    fn controller(&self) -> LuckyDraw {
        LuckyDraw::with_sampler(Box::new(RngSampler::from_seed_option(self.seed)))
            .with_max_candidates(self.max_candidates)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(config.as_deref()),
        Command::Run { config } => run_requests(config.as_deref()),
        Command::Draw {
            candidates,
            count,
            prize,
            seed,
        } => draw_once(&candidates, count, &prize, seed),
    }
}

/// Serve the HTTP API until Ctrl-C
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let (config, service) = boot(config_path)?;
    let server = HttpServer::with_config(config.http_config(), Arc::new(service));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::server_error(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::server_error(format!("HTTP server failed: {}", e)))
    })
}

/// Answer one JSON request per stdin line until EOF
pub fn run_requests(config_path: Option<&Path>) -> CliResult<()> {
    // stdout carries responses only
    Logger::set_output(LogOutput::Stderr);

    let (_config, service) = boot(config_path)?;
    let handler = ApiHandler::new(&service);

    for line in read_requests() {
        match line {
            Ok(request) => write_json(&handler.handle(&request).to_json())?,
            Err(e) => {
                write_error(e.code_str(), e.message())?;
                break;
            }
        }
    }

    log_event(Event::ShutdownComplete);
    Ok(())
}

/// Draw once from a candidate file and print the session as JSON
pub fn draw_once(
    candidates: &Path,
    count: usize,
    prize: &str,
    seed: Option<u64>,
) -> CliResult<()> {
    Logger::set_output(LogOutput::Stderr);
    let content = fs::read_to_string(candidates).map_err(|e| {
        CliError::io_error(format!(
            "Failed to read candidates {}: {}",
            candidates.display(),
            e
        ))
    })?;

    let config = Config {
        seed,
        ..Config::default()
    };
    let mut draw = config.controller();

    let is_csv = candidates
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        draw.load_candidates_csv(&content)?;
    } else {
        draw.load_candidates(&content)?;
    }

    let session = draw.draw(count, prize)?;
    write_json(&serde_json::to_string(&session)?)
}

/// Load configuration and build the shared draw service
fn boot(config_path: Option<&Path>) -> CliResult<(Config, DrawService)> {
    log_event(Event::BootStart);

    let config = Config::load(config_path)?;
    let source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    log_event_with_fields(Event::ConfigLoaded, &[("source", &source)]);

    let service = match &config.state_file {
        Some(path) => DrawService::boot(config.controller(), SnapshotStore::new(path))?,
        None => DrawService::new(config.controller()),
    };

    log_event(Event::BootComplete);
    Ok((config, service))
}
