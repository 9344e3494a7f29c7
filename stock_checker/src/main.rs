//! Stock Checker - polls store inventory and pushes new stock alerts
//!
//! Runs continuously until Ctrl-C, or a single cycle with `--once`.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use stock_checker::{spawn_sweeper, Config, DedupCache, Notifier, StockChecker};
use tokio::sync::watch;

/// Watch store inventory for wanted models and push alerts when stock appears
#[derive(Parser, Debug)]
#[command(name = "stock_checker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the JSON config file (default: ~/.config/stock_checker/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wanted model code, repeat for several (replaces modelsWanted from the config)
    #[arg(short, long = "model")]
    models: Vec<String>,

    /// Prowl API key for push notifications
    #[arg(long, env = "PROWL_API_KEY")]
    prowl_api_key: Option<String>,

    /// Idle time between polls in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Run one poll cycle and exit
    #[arg(long, default_value_t = false)]
    once: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if !self.models.is_empty() {
            config.models_wanted = self.models;
        }
        if self.prowl_api_key.is_some() {
            config.prowl_api_key = self.prowl_api_key;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.poll_interval_ms = interval_ms;
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let once = args.once;

    let mut config = match Config::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    args.apply(&mut config);

    log::info!("Starting stock_checker...");

    let notifier = Notifier::new(
        &config.prowl_url,
        config.prowl_api_key.clone(),
        &config.application,
        &config.event,
    );
    let cache = Arc::new(DedupCache::new(config.dedup_window()));

    let checker =
        match StockChecker::from_config(&config, notifier.clone(), Arc::clone(&cache)).await {
            Ok(checker) => checker,
            Err(e) => {
                log::error!("Startup failed: {}", e);
                notifier.flush().await;
                std::process::exit(1);
            }
        };

    if once {
        checker.run_cycle().await;
        notifier.flush().await;
        return;
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_sweeper(cache, config.sweep_interval(), shutdown_rx.clone());

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C, polling until killed: {}", e);
            std::future::pending::<()>().await;
        }
        log::info!("Shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    checker.run(shutdown_rx).await;

    if let Err(e) = sweeper.await {
        log::warn!("Sweeper task failed: {}", e);
    }
    notifier.flush().await;
    log::info!("stock_checker stopped.");
}
