//! The border state coordinator.
//!
//! [`Coordinator`] owns the [`StateStore`] and is the only thing that
//! mutates it. The host calls one method per event:
//!
//! 1. [`on_startup`](Coordinator::on_startup) once, before the first tick
//! 2. [`on_tick`](Coordinator::on_tick) every game tick
//! 3. [`on_player_join`](Coordinator::on_player_join),
//!    [`on_player_death`](Coordinator::on_player_death), and
//!    [`on_command`](Coordinator::on_command) as they happen
//! 4. [`on_shutdown`](Coordinator::on_shutdown) once, on the way out
//!
//! All calls must come from the same task.

use std::collections::BTreeMap;

use borders_types::{ItemId, PlayerId, Position};
use tracing::{debug, info, warn};

use crate::border::{self, JoinOutcome, ResizeOutcome};
use crate::commands::{self, Command, CommandError, CommandOutcome};
use crate::config::BordersConfig;
use crate::death;
use crate::discovery::{self, DiscoveryOutcome};
use crate::failsafe;
use crate::host::{Host, ItemRegistry, SnapshotStore};
use crate::inventory;
use crate::snapshot::{BordersSnapshot, RestoreReport};
use crate::state::StateStore;

/// One discovery processed during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryEvent {
    /// Who picked the item up.
    pub player: PlayerId,
    /// The item.
    pub item: ItemId,
    /// What the discovery did.
    pub outcome: DiscoveryOutcome,
}

/// Summary of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number after advancing.
    pub tick: u64,
    /// Discoveries in processing order.
    pub discoveries: Vec<DiscoveryEvent>,
    /// The failsafe expansion, if it fired.
    pub failsafe: Option<ResizeOutcome>,
}

/// How startup state was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    /// State was restored from a snapshot.
    Restored(RestoreReport),
    /// No snapshot existed; starting from configuration defaults.
    Fresh,
    /// A snapshot existed but could not be read or decoded; starting from
    /// configuration defaults.
    Unreadable,
}

/// Owns the border state and routes host events to the policies.
#[derive(Debug, Clone)]
pub struct Coordinator {
    state: StateStore,
    ticks_per_second: u32,
}

impl Coordinator {
    /// Create a coordinator with fresh state from configuration.
    pub fn new(config: &BordersConfig) -> Self {
        Self::with_state(StateStore::new(&config.game), config.timing.ticks_per_second)
    }

    /// Create a coordinator around existing state.
    pub const fn with_state(state: StateStore, ticks_per_second: u32) -> Self {
        Self {
            state,
            ticks_per_second,
        }
    }

    /// Read-only view of the state.
    pub const fn state(&self) -> &StateStore {
        &self.state
    }

    /// Ticks per second used for command conversions.
    pub const fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    /// Run one game tick.
    ///
    /// Diffs every online player's inventory against the previous tick,
    /// routes new items to discovery while the game is active, replaces the
    /// inventory snapshots, then evaluates the failsafe once.
    pub fn on_tick<H>(&mut self, host: &mut H) -> TickSummary
    where
        H: Host + ?Sized,
    {
        let tick = self.state.advance_tick();
        let mut discoveries = Vec::new();
        let mut snapshots = BTreeMap::new();

        for player in host.online_players() {
            let current = host.scan_inventory(player);
            let increased =
                inventory::detect_increased(self.state.last_inventory_snapshot.get(&player), &current);

            if self.state.game_active {
                for item in increased.into_keys() {
                    if self.state.obtained_items.contains(&item) {
                        continue;
                    }
                    let outcome = discovery::handle_discovery(&mut self.state, host, player, &item);
                    discoveries.push(DiscoveryEvent {
                        player,
                        item,
                        outcome,
                    });
                }
            }

            snapshots.insert(player, current);
        }
        self.state.last_inventory_snapshot = snapshots;

        let failsafe = failsafe::evaluate(&mut self.state, host);

        if !discoveries.is_empty() || failsafe.is_some() {
            debug!(
                tick,
                discoveries = discoveries.len(),
                failsafe = failsafe.is_some(),
                size = self.state.border_size,
                "Tick complete"
            );
        }

        TickSummary {
            tick,
            discoveries,
            failsafe,
        }
    }

    /// Handle a player joining at `position`.
    pub fn on_player_join<H>(&mut self, host: &mut H, player: PlayerId, position: Position) -> JoinOutcome
    where
        H: Host + ?Sized,
    {
        border::on_join(&mut self.state, host, player, position)
    }

    /// Handle a player death.
    pub fn on_player_death<H>(&mut self, host: &mut H, player: PlayerId) -> Option<ResizeOutcome>
    where
        H: Host + ?Sized,
    {
        death::handle_death(&mut self.state, host, player)
    }

    /// Apply an operator command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the command is rejected. State is left
    /// unchanged in that case.
    pub fn on_command<H>(&mut self, host: &mut H, command: Command) -> Result<CommandOutcome, CommandError>
    where
        H: Host + ?Sized,
    {
        commands::apply(&mut self.state, host, command, self.ticks_per_second)
    }

    /// Restore state from `store`, then push the border to the host.
    ///
    /// Read and decode failures are logged and leave the current
    /// (configuration default) state in place.
    pub fn on_startup<S, H>(
        &mut self,
        store: &S,
        registry: &dyn ItemRegistry,
        host: &mut H,
    ) -> StartupOutcome
    where
        S: SnapshotStore + ?Sized,
        H: Host + ?Sized,
    {
        let outcome = match store.read() {
            Ok(None) => {
                info!("No saved border state, starting fresh");
                StartupOutcome::Fresh
            }
            Ok(Some(bytes)) => match BordersSnapshot::from_json_bytes(&bytes) {
                Ok(snapshot) => {
                    let report = snapshot.restore_into(&mut self.state, registry);
                    info!(
                        size = self.state.border_size,
                        tick = self.state.global_tick,
                        discovered = self.state.obtained_items.len(),
                        dropped_items = report.dropped_items,
                        repaired = report.repaired,
                        "Restored border state"
                    );
                    StartupOutcome::Restored(report)
                }
                Err(e) => {
                    warn!(error = %e, "Saved border state is malformed, starting fresh");
                    StartupOutcome::Unreadable
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to read saved border state, starting fresh");
                StartupOutcome::Unreadable
            }
        };

        if self.state.border_initialized {
            border::sync_state(&self.state, host);
            host.refresh_border_label(self.state.border_size);
        }
        outcome
    }

    /// Save state to `store`. Failures are logged; returns whether the save
    /// succeeded.
    pub fn on_shutdown<S>(&self, store: &S) -> bool
    where
        S: SnapshotStore + ?Sized,
    {
        let bytes = match BordersSnapshot::capture(&self.state).to_json_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Failed to encode border state");
                return false;
            }
        };

        match store.write(&bytes) {
            Ok(()) => {
                info!(
                    size = self.state.border_size,
                    tick = self.state.global_tick,
                    bytes = bytes.len(),
                    "Saved border state"
                );
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to save border state");
                false
            }
        }
    }
}
