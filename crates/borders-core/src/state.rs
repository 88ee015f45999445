//! The single authoritative record of border and game state.
//!
//! All policies read and write through [`StateStore`]. It is owned by the
//! [`Coordinator`](crate::coordinator::Coordinator) and mutated only from the
//! host's main loop, so no synchronization is needed.

use std::collections::{BTreeMap, BTreeSet};

use borders_types::{ItemId, PlayerId, Position};

use crate::config::GameConfig;

/// Smallest diameter the border may take, and the size before initialization.
pub const MIN_BORDER_SIZE: f64 = 16.0;

/// Width of the grid cells the border center snaps to.
pub const CELL_SIZE: f64 = 16.0;

/// Per-player inventory counts keyed by item.
pub type InventoryCounts = BTreeMap<ItemId, u32>;

/// Border and game state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStore {
    /// Whether the border has been centered on the initial spawn.
    pub border_initialized: bool,
    /// Border diameter. Never below [`MIN_BORDER_SIZE`] once initialized.
    pub border_size: f64,
    /// Border center, east-west.
    pub border_center_x: f64,
    /// Border center, north-south.
    pub border_center_z: f64,
    /// Overworld spawn recorded at initialization.
    pub initial_spawn_pos: Option<Position>,
    /// Whether discoveries are being tracked.
    pub game_active: bool,
    /// Whether the inactivity failsafe may fire.
    pub failsafe_enabled: bool,
    /// Monotonic tick counter.
    pub global_tick: u64,
    /// Tick of the last discovery or timer rebase. Never exceeds `global_tick`.
    pub last_discovery_tick: u64,
    /// Idle ticks before the failsafe fires.
    pub failsafe_delay_ticks: u64,
    /// Blocks added per side per discovery.
    pub discovery_growth_per_side: i32,
    /// Whether deaths shrink the border.
    pub death_shrink_enabled: bool,
    /// Blocks removed per side per death.
    pub death_shrink_per_side: i32,
    /// Discoveries still to be recorded without effect.
    pub ignored_discoveries_remaining: u32,
    /// Every item anyone has discovered. Grows only until reset.
    pub obtained_items: BTreeSet<ItemId>,
    /// Item counts per online player as of the previous tick. Not persisted.
    pub last_inventory_snapshot: BTreeMap<PlayerId, InventoryCounts>,
}

impl StateStore {
    /// Create a fresh store seeded from the game configuration.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            border_initialized: false,
            border_size: MIN_BORDER_SIZE,
            border_center_x: 0.0,
            border_center_z: 0.0,
            initial_spawn_pos: None,
            game_active: false,
            failsafe_enabled: config.failsafe_enabled,
            global_tick: 0,
            last_discovery_tick: 0,
            failsafe_delay_ticks: config.failsafe_delay_ticks,
            discovery_growth_per_side: config.discovery_growth_per_side,
            death_shrink_enabled: config.death_shrink_enabled,
            death_shrink_per_side: config.death_shrink_per_side,
            ignored_discoveries_remaining: config.ignored_discoveries,
            obtained_items: BTreeSet::new(),
            last_inventory_snapshot: BTreeMap::new(),
        }
    }

    /// Advance the tick counter by one and return the new value.
    pub const fn advance_tick(&mut self) -> u64 {
        self.global_tick = self.global_tick.saturating_add(1);
        self.global_tick
    }

    /// Restart the inactivity countdown from the current tick.
    pub const fn rebase_discovery_timer(&mut self) {
        self.last_discovery_tick = self.global_tick;
    }

    /// Ticks elapsed since the last discovery or rebase.
    pub const fn idle_ticks(&self) -> u64 {
        self.global_tick.saturating_sub(self.last_discovery_tick)
    }

    /// Diameter change for one discovery, or `None` when growth is disabled
    /// (per-side value of zero or less).
    pub fn discovery_growth_diameter(&self) -> Option<f64> {
        per_side_to_diameter(self.discovery_growth_per_side)
    }

    /// Diameter change for one death, or `None` when the per-side value is
    /// zero or less.
    pub fn death_shrink_diameter(&self) -> Option<f64> {
        per_side_to_diameter(self.death_shrink_per_side)
    }

    /// Bring loaded values back inside their invariants.
    ///
    /// Returns `true` if anything was changed.
    pub fn repair_invariants(&mut self) -> bool {
        let mut repaired = false;

        if !self.border_size.is_finite() || self.border_size < MIN_BORDER_SIZE {
            self.border_size = MIN_BORDER_SIZE;
            repaired = true;
        }
        if !self.border_center_x.is_finite() {
            self.border_center_x = 0.0;
            repaired = true;
        }
        if !self.border_center_z.is_finite() {
            self.border_center_z = 0.0;
            repaired = true;
        }
        if self.last_discovery_tick > self.global_tick {
            self.last_discovery_tick = self.global_tick;
            repaired = true;
        }

        repaired
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

fn per_side_to_diameter(per_side: i32) -> Option<f64> {
    (per_side > 0).then(|| f64::from(per_side) * 2.0)
}
