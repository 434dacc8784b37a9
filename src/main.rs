//! `vmc-mop-bridge`: receive VMC, stream Mop, until Ctrl-C.
//!
//! Environment:
//! - `BRIDGE_SETTINGS`: settings file (default `./Settings.json`, created if missing)
//! - `BRIDGE_TICK_HZ`: ticks per second (default 60)
//! - `BRIDGE_LOG_FORMAT`: `json` for JSON lines
//! - `RUST_LOG`: log filter (default `info`)

use std::time::{Duration, Instant};

use log::{info, warn};
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;

use vmc_mop_bridge::config::{RuntimeConfig, SettingsStore, SettingsWatcher};
use vmc_mop_bridge::rig::HumanoidRig;
use vmc_mop_bridge::{Bridge, BridgeError, logging};

/// How often the settings file is checked for external edits.
const SETTINGS_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<(), BridgeError> {
    let runtime_config = RuntimeConfig::from_env();
    logging::init(runtime_config.log_format);

    let store = SettingsStore::new(&runtime_config.settings_path);
    let settings = store.load_or_create()?;
    let mut watcher = SettingsWatcher::new(store.clone(), settings.clone());

    let mut bridge =
        Bridge::new(HumanoidRig::standard(), settings, Handle::current()).with_store(store);
    if let Err(e) = bridge.start() {
        warn!("starting with a transport down: {e}");
    }
    let config = bridge.config_handle();

    let mut ticker = tokio::time::interval(runtime_config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut settings_poll = tokio::time::interval(SETTINGS_POLL_INTERVAL);
    settings_poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("bridge running at {} Hz, Ctrl-C to stop", runtime_config.tick_hz);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                bridge.tick(Instant::now());
            }
            _ = settings_poll.tick() => match watcher.poll() {
                Ok(changes) => {
                    for change in changes {
                        config.send(change);
                    }
                }
                Err(e) => warn!("ignoring settings file edit: {e}"),
            },
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!("signal handler failed: {e}");
                }
                break;
            }
        }
    }

    info!("shutting down");
    bridge.shutdown();
    Ok(())
}
