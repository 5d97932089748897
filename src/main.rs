//! kubetray - every Kubernetes context, namespace and workload in one menu
//!
//! Splits the user's kubeconfig into one credential file per context, then
//! keeps a menu tree in sync with the clusters and runs kubectl actions from
//! it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use kubetray::cli::{self, ConfigSubcommand};
use kubetray::config::{self, ConfigLoader};
use kubetray::kube::{CredentialStore, KubeScopeResolver, ProcessRunner};
use kubetray::{AutoRefresh, Driver, Listeners, Reconciler, RefreshRequest, Tree};

/// Every Kubernetes context, namespace and workload in one menu
#[derive(Parser, Debug)]
#[command(name = "kubetray")]
#[command(about = "Every Kubernetes context, namespace and workload in one menu", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// List the per-context kubeconfigs
    Contexts {
        /// Delete and re-derive them from the kubeconfig first
        #[arg(long)]
        clean: bool,
    },
    /// Run one reconciliation pass and print the resulting tree
    Tree,
    /// Show version information
    Version,
}

/// Everything the running application shares
struct Runtime {
    reconciler: Reconciler,
    store: CredentialStore,
    requests_rx: mpsc::UnboundedReceiver<RefreshRequest>,
}

impl Runtime {
    fn build(config: &config::Config) -> Result<Self> {
        let store = CredentialStore::new(config::paths::data_dir());
        store
            .load(false)
            .context("Failed to load per-context kubeconfigs")?;

        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        let listeners = Listeners::new(
            Arc::new(ProcessRunner),
            requests_tx,
            config.console_command(),
            config.kubectl.clone(),
        );
        let resolver = Arc::new(KubeScopeResolver::new(store.clone()));
        let reconciler = Reconciler::new(Tree::new(), resolver, listeners);

        Ok(Self {
            reconciler,
            store,
            requests_rx,
        })
    }

    fn driver(self, config: &config::Config, auto_refresh: AutoRefresh) -> Driver {
        Driver::new(
            self.reconciler,
            self.requests_rx,
            auto_refresh,
            Duration::from_secs(config.auto_refresh.interval),
        )
        .with_store(self.store)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Command::Config { subcommand }) => return cli::handle_config_command(subcommand),
        Some(Command::Version) => {
            cli::display_version();
            return Ok(());
        }
        _ => {}
    }

    let log_file = cli::init_logging(args.debug);
    if args.debug {
        if let Some(ref log_path) = log_file {
            eprintln!("Debug logging enabled. Logs written to: {}", log_path.display());
        }
    }

    match args.command {
        Some(Command::Contexts { clean }) => cli::handle_contexts_command(clean),
        Some(Command::Tree) => print_tree().await,
        _ => run().await,
    }
}

/// One full pass, then the tree as indented text
async fn print_tree() -> Result<()> {
    let config = ConfigLoader::load().context("Failed to load configuration")?;
    let runtime = Runtime::build(&config)?;

    let report = runtime.reconciler.full_pass().await?;
    print!("{}", runtime.reconciler.tree().menu().render_text());
    for (context, reason) in &report.skipped {
        eprintln!("skipped {}: {}", context, reason);
    }
    if report.orphans > 0 {
        eprintln!("{} instances referenced unknown namespaces", report.orphans);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = ConfigLoader::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load configuration, using defaults: {:#}", e);
        config::Config::default()
    });
    tracing::info!(
        "Starting kubetray (auto refresh {}, every {}s)",
        config.auto_refresh.enabled,
        config.auto_refresh.interval
    );

    let runtime = Runtime::build(&config)?;
    let auto_refresh = AutoRefresh::new(config.auto_refresh.enabled);

    #[cfg(feature = "tui")]
    {
        let menu = runtime.reconciler.tree().menu().clone();
        let requests_tx = runtime.reconciler.listeners().requests();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let driver = tokio::spawn(runtime.driver(&config, auto_refresh.clone()).run(async {
            let _ = stop_rx.await;
        }));

        let outcome = kubetray::tui::run_tui(menu, requests_tx, auto_refresh, config).await;
        let _ = stop_tx.send(());
        if let Err(e) = driver.await {
            tracing::warn!("Refresh driver task failed: {}", e);
        }
        outcome
    }

    #[cfg(not(feature = "tui"))]
    {
        let interrupted = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Interrupted, shutting down"),
                Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
            }
        };
        runtime.driver(&config, auto_refresh).run(interrupted).await;
        Ok(())
    }
}
