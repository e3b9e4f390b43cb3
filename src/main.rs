use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use countersync::bridge::BridgeLayer;
use countersync::channel::BroadcastBus;
use countersync::config::Config;
use countersync::logging::init_tracing;
use countersync::session::run_session;
use countersync::store::{CounterValue, FileStore, MemoryStore, StoreService};
use countersync::widget::{ConsoleHost, HomeWidgetProvider, RefreshTrigger, TapRegion};

#[derive(Parser, Debug)]
#[command(
    name = "countersync",
    version,
    about = "Shared counter kept in sync between an app, its embedded view and a home-screen widget"
)]
struct Cli {
    /// Path to config file (default: ~/.config/countersync/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the shared count (getSharedCount)
    Get,
    /// Overwrite the shared count (setSharedCount)
    Set { value: u32 },
    /// Tap a region of the home-screen widget
    Tap {
        #[arg(value_parser = parse_region)]
        region: TapRegion,
    },
    /// Redraw the home-screen widget instances from the store
    Refresh,
    /// Run the app and the widget together, driven by stdin
    Session {
        /// Use a throwaway in-memory store instead of the data directory
        #[arg(long)]
        in_memory: bool,
    },
}

fn parse_region(s: &str) -> Result<TapRegion, String> {
    TapRegion::parse(s).ok_or_else(|| format!("unknown region '{}' (expected plus or minus)", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    init_tracing(&config.logging.level);

    let file_store = || {
        let backend = FileStore::from_config(&config.store);
        tracing::debug!(path = %backend.path().display(), "Using file store");
        StoreService::new(Arc::new(backend), &config.store.key)
    };

    match cli.command {
        Command::Get => {
            let (bridge, server) = BridgeLayer::new();
            tokio::spawn(server.run(file_store(), BroadcastBus::new(config.broadcast.capacity)));
            let value = bridge.get_shared_count().await?;
            println!("{}", value);
        }
        Command::Set { value } => {
            let (bridge, server) = BridgeLayer::new();
            tokio::spawn(server.run(file_store(), BroadcastBus::new(config.broadcast.capacity)));
            bridge.set_shared_count(CounterValue::new(value)).await?;
            println!("{}", value);
        }
        Command::Tap { region } => {
            let host = ConsoleHost::new(&config.widget.instances, std::io::stdout());
            let bus = BroadcastBus::new(config.broadcast.capacity);
            let mut provider = HomeWidgetProvider::new(file_store(), bus, host);
            let report = provider.on_tap(region.action()).await?;
            if !report.is_complete() {
                eprintln!("{} widget instance(s) failed to redraw", report.failed.len());
            }
        }
        Command::Refresh => {
            let host = ConsoleHost::new(&config.widget.instances, std::io::stdout());
            let bus = BroadcastBus::new(config.broadcast.capacity);
            let mut provider = HomeWidgetProvider::new(file_store(), bus, host);
            provider.on_refresh(RefreshTrigger::StoreChanged).await?;
        }
        Command::Session { in_memory } => {
            let store = if in_memory {
                StoreService::new(Arc::new(MemoryStore::new()), &config.store.key)
            } else {
                file_store()
            };
            let host = ConsoleHost::new(&config.widget.instances, std::io::stdout());
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut out = std::io::stdout();
            run_session(&config, store, input, host, &mut out).await?;
        }
    }

    Ok(())
}
