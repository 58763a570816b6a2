// # plugin-probe - DNS Plugin Diagnostic
//
// Thin integration layer over the plugin adapter. It carries no DNS logic of
// its own:
// 1. Read configuration from environment variables
// 2. Initialize tracing and the tokio runtime
// 3. Negotiate with the plugin
// 4. Fetch and log the current records
//
// ## Configuration
//
// - `PLUGIN_URL`: Base URL of the plugin (required)
// - `PLUGIN_REQUEST_TIMEOUT_SECS`: Per-request deadline (default 30)
// - `PLUGIN_NEGOTIATION_TIMEOUT_SECS`: Deadline for the negotiation probe (default 10)
// - `PLUGIN_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export PLUGIN_URL=http://localhost:8888
// export PLUGIN_LOG_LEVEL=debug
//
// plugin-probe
// ```

use anyhow::{Context, Result};
use dns_plugin_core::{CancellationToken, DnsProvider, Error, FailureKind, PluginConfig};
use dns_provider_plugin::PluginProvider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean run (or interrupted by the operator)
/// - 1: Configuration or negotiation error
/// - 2: Runtime error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeExitCode {
    /// Records listed, or the operator interrupted the probe
    Clean = 0,
    /// Configuration error or failed negotiation
    ConfigError = 1,
    /// Any failure after a successful negotiation
    RuntimeError = 2,
}

impl From<ProbeExitCode> for ExitCode {
    fn from(code: ProbeExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    plugin: PluginConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("PLUGIN_URL").context(
            "PLUGIN_URL is required. Set it via: export PLUGIN_URL=http://localhost:8888",
        )?;

        let mut plugin = PluginConfig::new(url);
        if let Some(secs) = lookup("PLUGIN_REQUEST_TIMEOUT_SECS") {
            let secs = secs
                .parse()
                .with_context(|| format!("PLUGIN_REQUEST_TIMEOUT_SECS '{}' is not a number", secs))?;
            plugin = plugin.with_request_timeout_secs(secs);
        }
        if let Some(secs) = lookup("PLUGIN_NEGOTIATION_TIMEOUT_SECS") {
            let secs = secs.parse().with_context(|| {
                format!("PLUGIN_NEGOTIATION_TIMEOUT_SECS '{}' is not a number", secs)
            })?;
            plugin = plugin.with_negotiation_timeout_secs(secs);
        }

        Ok(Self {
            plugin,
            log_level: lookup("PLUGIN_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.plugin.validate()?;

        if self.log_level_filter().is_none() {
            anyhow::bail!(
                "PLUGIN_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }

    fn log_level_filter(&self) -> Option<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ProbeExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return ProbeExitCode::ConfigError.into();
    }

    let log_level = config.log_level_filter().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ProbeExitCode::ConfigError.into();
    }

    info!("Starting plugin-probe against {}", config.plugin.url);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ProbeExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run_probe(config)).into()
}

/// Negotiate with the plugin and log its records
async fn run_probe(config: Config) -> ProbeExitCode {
    let cancel = CancellationToken::new();

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT, cancelling in-flight request");
                on_interrupt.cancel();
            }
            Err(e) => warn!("Failed to listen for CTRL-C: {}", e),
        }
    });

    let provider = match PluginProvider::connect(config.plugin, &cancel).await {
        Ok(provider) => provider,
        Err(e) => return exit_code_for(&e, "Failed to connect to plugin"),
    };

    let records = match provider.records(&cancel).await {
        Ok(records) => records,
        Err(e) => return exit_code_for(&e, "Failed to list records"),
    };

    info!("Plugin returned {} record(s)", records.len());
    for record in &records {
        info!("{}", record);
    }

    ProbeExitCode::Clean
}

fn exit_code_for(err: &Error, context: &str) -> ProbeExitCode {
    if matches!(err, Error::Cancelled) {
        info!("{}: interrupted", context);
        return ProbeExitCode::Clean;
    }

    error!("{}: {}", context, err);
    match err.kind() {
        FailureKind::Configuration | FailureKind::Negotiation => ProbeExitCode::ConfigError,
        _ => ProbeExitCode::RuntimeError,
    }
}
