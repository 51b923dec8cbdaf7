//! firetv-autoplay - keeps playback running on a Fire TV

use std::sync::Arc;

use clap::Parser;
use tokio::sync::broadcast;
use tracing::{error, info};

use autoplay_utils::{init_logging_with_config, AutoplayError, Result};

mod adb;
mod api;
mod classifier;
mod cli;
mod config;
mod controller;
mod device;
mod discovery;
mod gate;
mod observability;
mod poll_loop;
#[cfg(test)]
mod testing;

use adb::{AdbCli, Transport};
use api::{ApiState, ControlServer};
use classifier::Classifier;
use cli::Cli;
use config::{AppConfig, ConfigLoader, DEFAULT_CONFIG_TOML};
use controller::ResumeController;
use discovery::{select_device, TerminalChooser};
use gate::LoopState;

async fn run_daemon(config: AppConfig) -> Result<()> {
    info!("firetv-autoplay starting");

    let transport: Arc<dyn Transport> = Arc::new(AdbCli::new(&config.device.adb_path));
    let device = select_device(
        transport,
        config.device.address.as_deref(),
        config.device.port,
        &TerminalChooser,
    )
    .await?;

    let classifier = Classifier::new(config.polling.foreground_strategy);
    info!(
        strategy = ?classifier.strategy(),
        action = ?config.polling.resume_action,
        settle_secs = config.polling.settle_secs,
        "Resume controller ready"
    );
    let controller = ResumeController::new(classifier, Arc::new(LoopState::new()))
        .with_settle_delay(config.polling.settle_delay())
        .with_action(config.polling.resume_action.clone());

    let (shutdown_tx, _) = broadcast::channel(4);
    let loop_shutdown_rx = shutdown_tx.subscribe();

    let api_task = if config.api.enabled {
        let addr = config.api.socket_addr().ok_or_else(|| {
            AutoplayError::config(format!("invalid listen address '{}'", config.api.listen_addr))
        })?;
        let server = ControlServer::bind(addr).await?;
        let state = Arc::new(ApiState {
            device: device.clone(),
            gate: Arc::clone(controller.state()),
            policy: config.api.override_policy(),
        });
        Some(tokio::spawn(server.serve(state, shutdown_tx.subscribe())))
    } else {
        None
    };

    let ctrl_c_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping after the current cycle");
            let _ = ctrl_c_tx.send(());
        }
    });

    let result = poll_loop::run(
        &controller,
        &device,
        config.polling.interval(),
        loop_shutdown_rx,
    )
    .await;

    let _ = shutdown_tx.send(());
    if let Some(task) = api_task {
        let _ = task.await;
    }

    if result.is_ok() {
        info!("firetv-autoplay stopped");
    }
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", DEFAULT_CONFIG_TOML);
        return Ok(());
    }

    let mut config = ConfigLoader::load_from(cli.config.as_deref())?;
    cli.apply(&mut config);
    ConfigLoader::validate(&config)?;

    init_logging_with_config(config.logging.to_log_config(cli.verbose))?;

    // Once logging is up, failures are reported through it alone
    if let Err(e) = run_daemon(config).await {
        error!("Something went wrong: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
