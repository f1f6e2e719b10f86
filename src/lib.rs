// src/lib.rs

pub mod cli;
pub mod config;
pub mod debounce;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ConfigFile;
use crate::debounce::settlement_channel;
use crate::exec::{spawn_consumer, CommandConsumer, PrintConsumer};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{spawn_watcher, ExtensionFilter, NotifyBackend, WatchOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the `notify` watch backend and the dispatcher loop
/// - the debounce coordinator and its settlement sink
/// - the consumer (command runner or stdout printer)
/// - Ctrl-C / SIGTERM handling
pub async fn run(cfg: ConfigFile, dry_run: bool) -> Result<()> {
    if dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    // Signal → graceful shutdown.
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            info!("shutting down...");
            shutdown.cancel();
        });
    }

    let (sink, settled_rx) = settlement_channel();

    let consumer = match &cfg.consumer.cmd {
        Some(argv) => spawn_consumer(
            settled_rx,
            CommandConsumer::new(argv.clone(), cfg.consumer.delete_after, Arc::clone(&fs)),
            shutdown.clone(),
        ),
        None => spawn_consumer(settled_rx, PrintConsumer, shutdown.clone()),
    };

    let (backend, streams) = NotifyBackend::new()?;
    let watcher = spawn_watcher(
        watch_options(&cfg),
        backend,
        streams,
        Arc::clone(&fs),
        sink,
        shutdown.clone(),
    )?;

    let coordinator = watcher.coordinator().clone();
    if let Some(err) = watcher.join().await? {
        warn!(error = %err, "watcher stopped; last runtime error");
    }

    let discarded = coordinator.drain();
    if discarded > 0 {
        info!(discarded, "pending countdowns discarded on shutdown");
    }

    // The dispatcher only returns after shutdown or when the event stream
    // closes; make sure the consumer stops in both cases.
    shutdown.cancel();
    let processed = consumer.await?;
    info!(processed, "bye!");
    Ok(())
}

/// Map the validated config onto watcher options.
pub fn watch_options(cfg: &ConfigFile) -> WatchOptions {
    WatchOptions {
        root: cfg.watch.root.clone(),
        filter: ExtensionFilter::new(cfg.watch.extensions.iter().cloned()),
        quiet_window: cfg.watch.quiet_window,
        stock: cfg.watch.stock,
    }
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    res = tokio::signal::ctrl_c() => {
                        if let Err(e) = res {
                            warn!(error = %e, "failed to listen for Ctrl+C");
                            sigterm.recv().await;
                        }
                    }
                    _ = sigterm.recv() => {}
                }
                return;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("filesettle dry-run");
    println!("  watch.root = {}", cfg.watch.root.display());
    println!("  watch.extensions = {:?}", cfg.watch.extensions);
    println!("  watch.quiet_window = {:?}", cfg.watch.quiet_window);
    println!("  watch.stock = {}", cfg.watch.stock);
    match &cfg.consumer.cmd {
        Some(cmd) => {
            println!("  consumer.cmd = {:?}", cmd);
            println!("  consumer.delete_after = {}", cfg.consumer.delete_after);
        }
        None => println!("  consumer = print settled paths to stdout"),
    }
    if let Some(ref file) = cfg.log.file {
        println!("  log.file = {}", file.display());
    }
}
