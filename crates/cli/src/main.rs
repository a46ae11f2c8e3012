//! Command-line interface for the CubeLink relay.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cubelink_api::ServerState;
use cubelink_core::RelayConfig;

/// CubeLink - relay operator commands to a simulated remote device.
#[derive(Parser, Debug)]
#[command(name = "cubelink")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the relay server.
    Serve {
        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to.
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
        /// Relay config file (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the effective relay configuration and exit.
    ShowConfig {
        /// Relay config file (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_directive = if args.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Command::Serve { host, port, config } => run_server(host, port, config).await,
        Command::ShowConfig { config } => show_config(config),
    }
}

async fn run_server(host: String, port: u16, config: Option<PathBuf>) -> Result<()> {
    let relay_config = RelayConfig::load(config.as_deref())?;
    tracing::info!(
        latency_secs = relay_config.command_latency_secs,
        period_secs = relay_config.telemetry_period_secs,
        "relay config loaded"
    );

    let ip: IpAddr = host
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid host address: {host}"))?;
    let bind = SocketAddr::new(ip, port);

    let state = ServerState::with_simulated_device(relay_config);
    cubelink_api::run(bind, state).await
}

fn show_config(config: Option<PathBuf>) -> Result<()> {
    let relay_config = RelayConfig::load(config.as_deref())?;
    println!("{}", toml::to_string_pretty(&relay_config)?);
    Ok(())
}
