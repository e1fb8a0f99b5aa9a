//! CLI entry point for donutbot.

mod cli;

use clap::Parser;
use donutbot::api::ApiClient;
use donutbot::bridge::EventBridge;
use donutbot::build_info;
use donutbot::config::{initialize_default_global_config, load_config_with, ConfigInitResult};
use donutbot::session::Session;
use donutbot::ui::Renderer;
use donutbot::world::{connect_agent, World};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(verbose: bool) {
    let fallback = if verbose { "donutbot=debug,warn" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_logging(args.verbose);

    if let Some(cli::Command::Init) = args.command {
        match initialize_default_global_config() {
            Ok(ConfigInitResult::Created { path }) => {
                println!("Created {}", path.display());
            }
            Ok(ConfigInitResult::AlreadyInitialized { path }) => {
                println!("Config already exists at {}", path.display());
            }
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let config = match load_config_with(args.config.as_deref(), |config| {
        if let Some(host) = &args.host {
            config.world.host = host.clone();
        }
        if let Some(agent) = &args.agent {
            config.world.agent_addr = agent.clone();
        }
        if args.no_color {
            config.display.color = false;
        }
    }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    info!(build = %build_info::startup_metadata_line(), "donutbot starting");
    let renderer = Arc::new(Renderer::new(
        config.display.color,
        config.display.clear_screen,
    ));

    let bridge = EventBridge::new();
    let mut conn =
        match connect_agent(&config.world.agent_addr, &config.world.host, bridge.clone()).await {
            Ok(conn) => conn,
            Err(e) => {
                eprintln!(
                    "error: failed to connect to {} via agent {}: {e}",
                    config.world.host, config.world.agent_addr
                );
                std::process::exit(1);
            }
        };
    let world = conn.world();
    info!(username = %world.username(), "bot joined");

    let api = Arc::new(ApiClient::new(&config.api));
    let mut session = Session::new(
        BufReader::new(tokio::io::stdin()),
        world,
        api,
        renderer,
        bridge,
        &config,
    );

    tokio::select! {
        biased;
        reason = conn.closed() => {
            error!(%reason, "world connection lost");
            eprintln!("Bot disconnected: {reason}");
            std::process::exit(1);
        }
        result = session.run() => {
            if let Err(e) = result {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}
