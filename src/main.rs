// Reward Hook binary
// Drives the simulated environment on a tick thread and serves closed episodes

use anyhow::{anyhow, Context};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use reward_hook::core::{setup_logging, Clock, ConfigManager, SystemClock};
use reward_hook::layer1::{ScriptedEnvironment, SimulatedDrive};
use reward_hook::layer3::EpisodeDriver;
use reward_hook::server;

/// Reward Hook - per-tick driving telemetry folded into fixed-window episodes
#[derive(Parser, Debug)]
#[command(name = "reward_hook")]
#[command(version)]
struct Args {
    /// JSON config file; missing sections keep their defaults
    #[arg(long, env = "REWARD_HOOK_CONFIG")]
    config: Option<String>,

    /// Log level override (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ConfigManager::new(args.config.as_deref()).context("loading configuration")?;
    if let Some(level) = &args.log_level {
        config.set_log_level(level);
    }
    if args.json_logs {
        config.set_json_format(true);
    }

    let monitoring = config.monitoring();
    setup_logging(Some(monitoring.log_level.as_str()), Some(monitoring.json_format));

    config.validate()?;
    info!(config = ?config.get_summary(), "Starting reward hook");

    let tick = config.tick();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let env = Arc::new(ScriptedEnvironment::new());
    let mut drive = SimulatedDrive::new(env.clone(), tick.tick_interval_ms as i64);
    let mut driver = EpisodeDriver::with_default_trackers(
        &config.episode(),
        &config.thresholds(),
        env,
        clock,
    )?;
    let store = driver.episode_history();
    info!(session_id = %driver.session_id(), "Episode driver ready");

    let running = Arc::new(AtomicBool::new(true));
    let tick_thread = {
        let running = running.clone();
        let interval = Duration::from_millis(tick.tick_interval_ms);
        std::thread::Builder::new()
            .name("tick".to_string())
            .spawn(move || {
                while running.load(Ordering::Relaxed) {
                    let started = Instant::now();
                    drive.advance();
                    driver.tick();
                    if let Some(remaining) = interval.checked_sub(started.elapsed()) {
                        std::thread::sleep(remaining);
                    }
                }
                info!(stats = %driver.get_stats(), "Tick loop stopped");
            })?
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
        }
        info!("Shutdown requested");
    };

    let served = server::serve(&config.server(), store, shutdown).await;

    running.store(false, Ordering::Relaxed);
    tick_thread.join().map_err(|_| anyhow!("tick thread panicked"))?;

    served.context("episode server failed")?;
    Ok(())
}
