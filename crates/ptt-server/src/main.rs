//! Remote PTT relay, entry point.
//!
//! This binary lets people on the LAN hold a push-to-talk key on this machine
//! from a browser.  It serves a small web page on one port and accepts the
//! page's WebSocket control channel on another; while any browser holds the
//! button, the configured key is held down on the host.
//!
//! # Usage
//!
//! ```text
//! ptt-server [OPTIONS] [COMMAND]
//!
//! Commands:
//!   setup   Interactively choose the key and ports, then write the config file
//!
//! Options:
//!   --config <PATH>   Configuration file [default: config.json]
//!   --bind   <IP>     Address both listeners bind to [default: 0.0.0.0]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable             | Default       | Description                        |
//! |----------------------|---------------|------------------------------------|
//! | `PTT_CONFIG`         | `config.json` | Configuration file path            |
//! | `PTT_BIND`           | `0.0.0.0`     | Listener bind address              |
//! | `PTT_PING_INTERVAL`  | `20`          | WebSocket ping interval (secs)     |
//! | `PTT_PING_TIMEOUT`   | `45`          | Silent session timeout (secs)      |
//!
//! # Architecture overview
//!
//! ```text
//! Browser ── HTTP ──► http_server  (index.html, app.js, style.css)
//! Browser ── WS ────► ws_server ──► ControlService ──► KeyActuator ──► enigo ──► OS
//!                         ▲                │
//!                         └── status ──────┘
//! ```

use std::io::{self, Write};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use ptt_core::{KeyIdentifier, PttConfig};
use ptt_server::application::{ControlService, KeyActuator};
use ptt_server::domain::ServerConfig;
use ptt_server::infrastructure::key_emulation::EnigoKeyEmulator;
use ptt_server::infrastructure::local_console::{run_local_console, spawn_stdin_reader};
use ptt_server::infrastructure::setup_wizard::SetupWizard;
use ptt_server::infrastructure::{
    bind_control_listener, bind_http_listener, lan, serve_control_channel, serve_static_assets,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote push-to-talk relay.
///
/// Serves a web page with a PTT button and holds the configured key on this
/// machine while a browser holds the button.
#[derive(Debug, Parser)]
#[command(
    name = "ptt-server",
    about = "Hold a push-to-talk key on this machine from any browser on the LAN",
    version
)]
struct Cli {
    /// Path of the JSON configuration file.
    ///
    /// A missing file means defaults (caps_lock, ports 8080 and 8765).
    #[arg(long, default_value = ptt_core::config::DEFAULT_CONFIG_FILE, env = "PTT_CONFIG")]
    config: PathBuf,

    /// IP address both listeners bind to.
    ///
    /// Use `0.0.0.0` to accept browsers from the LAN, or `127.0.0.1` for
    /// this machine only.
    #[arg(long, default_value = "0.0.0.0", env = "PTT_BIND")]
    bind: String,

    /// Seconds between WebSocket pings to each browser.
    #[arg(long, default_value_t = 20, env = "PTT_PING_INTERVAL", hide = true)]
    ping_interval: u64,

    /// Seconds of silence after which a browser is treated as gone.
    #[arg(long, default_value_t = 45, env = "PTT_PING_TIMEOUT", hide = true)]
    ping_timeout: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactively choose the key and ports, then write the config file.
    Setup,
}

impl Cli {
    /// Combines the CLI arguments with the loaded file into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not an IP address, a timing is zero,
    /// or the ping timeout does not exceed the ping interval.
    fn into_server_config(
        self,
        file: &PttConfig,
        ptt_key: KeyIdentifier,
    ) -> anyhow::Result<ServerConfig> {
        let ip: IpAddr = self
            .bind
            .parse()
            .with_context(|| format!("invalid bind address: '{}'", self.bind))?;

        if self.ping_interval == 0 || self.ping_timeout == 0 {
            anyhow::bail!("--ping-interval and --ping-timeout must be at least 1 second");
        }
        // A browser needs at least one ping to prove it is still there.
        if self.ping_timeout <= self.ping_interval {
            anyhow::bail!(
                "--ping-timeout ({}s) must be longer than --ping-interval ({}s)",
                self.ping_timeout,
                self.ping_interval
            );
        }

        Ok(ServerConfig {
            http_bind_addr: SocketAddr::new(ip, file.http_port),
            ws_bind_addr: SocketAddr::new(ip, file.ws_port),
            ping_interval: Duration::from_secs(self.ping_interval),
            ping_timeout: Duration::from_secs(self.ping_timeout),
            ptt_key,
            ..ServerConfig::default()
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. `tracing_subscriber` is initialised; `RUST_LOG` controls the level.
/// 2. CLI arguments are parsed.  `setup` runs the wizard and exits.
/// 3. `config.json` is loaded and validated; any problem is fatal.
/// 4. The key emulator, actuator and control service are started.
/// 5. Both listeners are bound; a port already in use is fatal.
/// 6. A local console on stdin lets the operator test PTT without a browser.
/// 7. Both servers run until Ctrl+C, then the key is released, every
///    browser is told `ptt_off`, and the process exits.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(Command::Setup) = cli.command {
        return run_setup(&cli.config);
    }

    // ── Configuration ─────────────────────────────────────────────────────────
    let file = PttConfig::load(&cli.config)
        .with_context(|| format!("cannot load {}", cli.config.display()))?;
    let ptt_key = file
        .validate()
        .with_context(|| format!("invalid configuration in {}", cli.config.display()))?;
    let config = Arc::new(cli.into_server_config(&file, ptt_key)?);

    // ── Key emulation and control service ────────────────────────────────────
    let emulator = EnigoKeyEmulator::spawn(config.ptt_key)
        .context("key emulation is not available on this machine")?;
    let actuator = KeyActuator::new(Arc::new(emulator), config.ptt_key);
    let (control, service) = ControlService::spawn(actuator);

    // ── Listeners ─────────────────────────────────────────────────────────────
    let http_listener = bind_http_listener(config.http_bind_addr).await?;
    let ws_listener = bind_control_listener(config.ws_bind_addr).await?;

    print_banner(&config);

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    // ── Status log ────────────────────────────────────────────────────────────
    let mut status = control.subscribe();
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let snapshot = *status.borrow_and_update();
            info!("status: PTT {} | {} client(s)", snapshot.ptt, snapshot.clients);
        }
    });

    // ── Local test PTT ────────────────────────────────────────────────────────
    match spawn_stdin_reader() {
        Ok(lines) => {
            let console = control.clone();
            tokio::spawn(async move {
                if run_local_console(lines, console, io::stdout()).await.is_err() {
                    debug!("local console stopped with the control service");
                }
            });
        }
        Err(e) => warn!("local console unavailable: {e}"),
    }

    // ── Servers ───────────────────────────────────────────────────────────────
    let (http_result, ws_result) = tokio::join!(
        serve_static_assets(http_listener, config.ws_port(), Arc::clone(&running)),
        serve_control_channel(
            ws_listener,
            control.clone(),
            Arc::clone(&config),
            Arc::clone(&running)
        ),
    );

    // The control channel shuts the service down on its way out; this covers
    // an early exit, and still releases the key before any error is reported.
    if control.shutdown().await.is_ok() {
        debug!("control service stopped by main");
    }
    drop(control);
    if let Err(e) = service.await {
        error!("control service task failed: {e}");
    }

    http_result?;
    ws_result?;

    info!("Remote PTT stopped");
    Ok(())
}

fn run_setup(path: &Path) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut wizard = SetupWizard::new(stdin.lock(), stdout.lock());
    if wizard.run(path)?.is_some() {
        println!("Run `ptt-server` to start the relay.");
    }
    Ok(())
}

fn print_banner(config: &ServerConfig) {
    let http_host = lan::display_host(config.http_bind_addr.ip());
    let ws_host = lan::display_host(config.ws_bind_addr.ip());
    let mut out = io::stdout().lock();
    let _ = writeln!(out);
    let _ = writeln!(out, "  Remote PTT is running");
    let _ = writeln!(
        out,
        "  Web UI : http://{http_host}:{}",
        config.http_bind_addr.port()
    );
    let _ = writeln!(out, "  Control: ws://{ws_host}:{}", config.ws_port());
    let _ = writeln!(out, "  PTT key: {}", config.ptt_key);
    let _ = writeln!(out, "  Test PTT here: Enter toggles, or type on / off / status.");
    let _ = writeln!(out, "  Press Ctrl+C to stop.");
    let _ = writeln!(out);
    let _ = out.flush();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        // Arrange: parse with no arguments (all defaults apply)
        let cli = Cli::parse_from(["ptt-server"]);

        // Assert
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert_eq!(cli.bind, "0.0.0.0");
        assert_eq!(cli.ping_interval, 20);
        assert_eq!(cli.ping_timeout, 45);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_config_override() {
        let cli = Cli::parse_from(["ptt-server", "--config", "/tmp/ptt.json"]);
        assert_eq!(cli.config, PathBuf::from("/tmp/ptt.json"));
    }

    #[test]
    fn test_cli_hidden_timing_overrides() {
        let cli = Cli::parse_from(["ptt-server", "--ping-interval", "5", "--ping-timeout", "12"]);
        assert_eq!(cli.ping_interval, 5);
        assert_eq!(cli.ping_timeout, 12);
    }

    #[test]
    fn test_cli_setup_subcommand() {
        let cli = Cli::parse_from(["ptt-server", "setup"]);
        assert!(matches!(cli.command, Some(Command::Setup)));
    }

    #[test]
    fn test_into_server_config_uses_file_ports() {
        // Arrange
        let cli = Cli::parse_from(["ptt-server", "--bind", "127.0.0.1"]);
        let file = PttConfig {
            ptt_key: "f13".to_string(),
            http_port: 9000,
            ws_port: 9001,
        };
        let key = file.validate().unwrap();

        // Act
        let config = cli.into_server_config(&file, key).unwrap();

        // Assert
        assert_eq!(config.http_bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.ws_bind_addr.to_string(), "127.0.0.1:9001");
        assert_eq!(config.ptt_key.name(), "f13");
        assert_eq!(config.ping_interval, Duration::from_secs(20));
    }

    #[test]
    fn test_into_server_config_invalid_bind_returns_error() {
        // Arrange
        let cli = Cli::parse_from(["ptt-server", "--bind", "not.an.ip"]);
        let file = PttConfig::default();

        // Act
        let result = cli.into_server_config(&file, KeyIdentifier::default());

        // Assert: must return an error, not panic
        assert!(result.is_err());
    }

    #[test]
    fn test_into_server_config_rejects_timeout_within_one_ping() {
        // Arrange: the session would be pruned before its first ping
        let cli = Cli::parse_from(["ptt-server", "--ping-interval", "30", "--ping-timeout", "20"]);

        // Act
        let result = cli.into_server_config(&PttConfig::default(), KeyIdentifier::default());

        // Assert
        let err = result.unwrap_err();
        assert!(err.to_string().contains("must be longer than --ping-interval"));
    }

    #[test]
    fn test_into_server_config_rejects_zero_timing() {
        let cli = Cli::parse_from(["ptt-server", "--ping-timeout", "0"]);
        let result = cli.into_server_config(&PttConfig::default(), KeyIdentifier::default());
        assert!(result.is_err());
    }
}
