//! Headless host for the Borders coordinator.
//!
//! Runs the border state coordinator against an in-memory world, fed by
//! console lines on stdin. Useful for exercising the game mode end to end
//! without a game server.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `borders-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the item registry and the headless world
//! 4. Open the snapshot store
//! 5. Start the console reader task
//! 6. Run the session (restore, tick loop, save)
//! 7. Log the result

mod console;
mod error;
mod runner;
mod world;

use std::path::Path;

use borders_core::{BordersConfig, Coordinator, ItemRegistry, KnownItems, OpenRegistry};
use borders_persist::FileSnapshotStore;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::runner::Session;
use crate::world::SimulatedWorld;

/// Configuration file looked up in the working directory.
const CONFIG_FILE: &str = "borders-config.yaml";

/// Console events buffered between the reader task and the session loop.
const EVENT_BUFFER: usize = 256;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is unusable.
/// Persistence failures are logged and never end the process.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember whether the
    //    file was found and report it afterwards.
    let (config, from_file) = load_config()?;
    validate(&config)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("borders-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        ticks_per_second = config.timing.ticks_per_second,
        failsafe_delay_ticks = config.game.failsafe_delay_ticks,
        discovery_growth_per_side = config.game.discovery_growth_per_side,
        snapshot_path = %config.persistence.snapshot_path.display(),
        "Configuration loaded"
    );

    // 3. Item registry and world.
    let registry = build_registry(&config);
    if config.world.dimensions.is_empty() {
        warn!("No dimensions configured, borders will not be visible anywhere");
    }
    let world = SimulatedWorld::new(&config.world.dimensions);
    let mut session = Session::new(Coordinator::new(&config), world, registry);

    // 4. Snapshot store.
    let store = FileSnapshotStore::new(config.persistence.snapshot_path.clone());
    info!(path = %store.path().display(), "Snapshot store ready");

    // 5. Console reader.
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    tokio::spawn(console::forward_lines(tokio::io::stdin(), tx));

    // 6. Run until quit or ctrl-c.
    let period = runner::tick_period(config.timing.ticks_per_second);
    let result = runner::run(&mut session, &store, rx, period).await;

    // 7. Log results.
    for &dimension in &config.world.dimensions {
        if let Some(border) = session.world().border(dimension) {
            info!(
                %dimension,
                size = border.size,
                center_x = border.center_x,
                center_z = border.center_z,
                "Final border"
            );
        }
    }
    info!(
        label = ?session.world().border_label(),
        startup = ?result.startup,
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        saved = result.saved,
        "borders-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `borders-config.yaml` in the working directory.
///
/// Returns the configuration and whether it came from the file.
fn load_config() -> Result<(BordersConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() {
        let config = BordersConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        Ok((BordersConfig::parse("")?, false))
    }
}

/// Reject values the engine cannot run with.
fn validate(config: &BordersConfig) -> Result<(), EngineError> {
    if config.timing.ticks_per_second == 0 {
        return Err(EngineError::InvalidConfig {
            message: "timing.ticks_per_second must be at least 1".to_owned(),
        });
    }
    Ok(())
}

/// An explicit item list restricts the registry; an empty list accepts
/// every well-formed identifier.
fn build_registry(config: &BordersConfig) -> Box<dyn ItemRegistry> {
    if config.world.known_items.is_empty() {
        return Box::new(OpenRegistry);
    }
    let known = KnownItems::from_raw(config.world.known_items.iter().map(String::as_str));
    if known.is_empty() {
        warn!("No usable entries in world.known_items, accepting every item");
        return Box::new(OpenRegistry);
    }
    info!(known_items = known.len(), "Item registry restricted");
    Box::new(known)
}
