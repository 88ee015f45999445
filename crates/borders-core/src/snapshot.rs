//! Snapshot codec for persisting [`StateStore`] across restarts.
//!
//! The snapshot is pretty-printed JSON with camelCase keys. Every key is
//! optional: a key missing from the file leaves the corresponding state
//! field as it was before the restore, which for a fresh coordinator means
//! the value seeded from the `game` configuration. The key names used by
//! earlier releases of the mod are read as fallbacks and never written; when
//! a file carries both spellings the current one wins. Item ids are stored
//! as plain strings and resolved through an [`ItemRegistry`] on load.
//!
//! Per-player inventory snapshots are transient and never written.

use borders_types::Position;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::host::ItemRegistry;
use crate::state::StateStore;

/// Errors produced while encoding or decoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// JSON encoding or decoding failed.
    #[error("snapshot JSON error: {source}")]
    Json {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },

    /// A coordinate is NaN or infinite. JSON would store it as `null`,
    /// which no longer decodes.
    #[error("snapshot field `{field}` is not a finite number")]
    NonFinite {
        /// The offending key.
        field: &'static str,
    },
}

/// Persisted form of [`StateStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BordersSnapshot {
    /// See [`StateStore::border_initialized`].
    pub border_initialized: Option<bool>,
    /// See [`StateStore::border_size`].
    pub border_size: Option<f64>,
    /// See [`StateStore::border_center_x`].
    pub border_center_x: Option<f64>,
    /// See [`StateStore::border_center_z`].
    pub border_center_z: Option<f64>,
    /// See [`StateStore::initial_spawn_pos`]. Absent means no spawn recorded.
    pub initial_spawn_pos: Option<Position>,
    /// See [`StateStore::game_active`].
    pub game_active: Option<bool>,
    /// See [`StateStore::failsafe_enabled`].
    pub failsafe_enabled: Option<bool>,
    /// See [`StateStore::global_tick`].
    pub global_tick: Option<u64>,
    /// See [`StateStore::last_discovery_tick`].
    pub last_discovery_tick: Option<u64>,
    /// See [`StateStore::failsafe_delay_ticks`].
    pub failsafe_delay_ticks: Option<u64>,
    /// See [`StateStore::discovery_growth_per_side`].
    pub discovery_growth_per_side: Option<i32>,
    /// See [`StateStore::death_shrink_enabled`].
    pub death_shrink_enabled: Option<bool>,
    /// See [`StateStore::death_shrink_per_side`].
    pub death_shrink_per_side: Option<i32>,
    /// See [`StateStore::ignored_discoveries_remaining`].
    pub ignored_discoveries_remaining: Option<u32>,
    /// Canonical ids of [`StateStore::obtained_items`], sorted.
    pub obtained_item_ids: Vec<String>,

    /// Older spelling of `borderSize`.
    #[serde(rename = "currentBorderSize", skip_serializing)]
    pub legacy_border_size: Option<f64>,
    /// Older spelling of `failsafeDelayTicks`.
    #[serde(rename = "borderFailsafeDelayTicks", skip_serializing)]
    pub legacy_failsafe_delay_ticks: Option<u64>,
    /// Older spelling of `discoveryGrowthPerSide`.
    #[serde(rename = "discoveryGrowthBlocksPerSide", skip_serializing)]
    pub legacy_discovery_growth_per_side: Option<i32>,
    /// Older spelling of `deathShrinkPerSide`.
    #[serde(rename = "deathShrinkBlocksPerSide", skip_serializing)]
    pub legacy_death_shrink_per_side: Option<i32>,
}

/// What a restore changed beyond copying fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Item ids the registry no longer knows.
    pub dropped_items: usize,
    /// Whether out-of-range values were clamped.
    pub repaired: bool,
}

impl BordersSnapshot {
    /// Capture every persisted field of `state`.
    pub fn capture(state: &StateStore) -> Self {
        Self {
            border_initialized: Some(state.border_initialized),
            border_size: Some(state.border_size),
            border_center_x: Some(state.border_center_x),
            border_center_z: Some(state.border_center_z),
            initial_spawn_pos: state.initial_spawn_pos,
            game_active: Some(state.game_active),
            failsafe_enabled: Some(state.failsafe_enabled),
            global_tick: Some(state.global_tick),
            last_discovery_tick: Some(state.last_discovery_tick),
            failsafe_delay_ticks: Some(state.failsafe_delay_ticks),
            discovery_growth_per_side: Some(state.discovery_growth_per_side),
            death_shrink_enabled: Some(state.death_shrink_enabled),
            death_shrink_per_side: Some(state.death_shrink_per_side),
            ignored_discoveries_remaining: Some(state.ignored_discoveries_remaining),
            obtained_item_ids: state
                .obtained_items
                .iter()
                .map(|id| id.as_str().to_owned())
                .collect(),
            ..Self::default()
        }
    }

    /// Overwrite `state` with every field present in this snapshot.
    ///
    /// Missing fields keep their current value. Unknown item ids are
    /// dropped, inventory snapshots are cleared, and out-of-range values are
    /// clamped back inside their invariants.
    pub fn restore_into(
        self,
        state: &mut StateStore,
        registry: &dyn ItemRegistry,
    ) -> RestoreReport {
        keep_or_replace(&mut state.border_initialized, self.border_initialized);
        keep_or_replace(
            &mut state.border_size,
            self.border_size.or(self.legacy_border_size),
        );
        keep_or_replace(&mut state.border_center_x, self.border_center_x);
        keep_or_replace(&mut state.border_center_z, self.border_center_z);
        state.initial_spawn_pos = self.initial_spawn_pos;
        keep_or_replace(&mut state.game_active, self.game_active);
        keep_or_replace(&mut state.failsafe_enabled, self.failsafe_enabled);
        keep_or_replace(&mut state.global_tick, self.global_tick);
        keep_or_replace(&mut state.last_discovery_tick, self.last_discovery_tick);
        keep_or_replace(
            &mut state.failsafe_delay_ticks,
            self.failsafe_delay_ticks.or(self.legacy_failsafe_delay_ticks),
        );
        keep_or_replace(
            &mut state.discovery_growth_per_side,
            self.discovery_growth_per_side
                .or(self.legacy_discovery_growth_per_side),
        );
        keep_or_replace(&mut state.death_shrink_enabled, self.death_shrink_enabled);
        keep_or_replace(
            &mut state.death_shrink_per_side,
            self.death_shrink_per_side
                .or(self.legacy_death_shrink_per_side),
        );
        keep_or_replace(
            &mut state.ignored_discoveries_remaining,
            self.ignored_discoveries_remaining,
        );
        state.last_inventory_snapshot.clear();

        state.obtained_items.clear();
        let mut dropped_items: usize = 0;
        for raw in &self.obtained_item_ids {
            if let Some(id) = registry.resolve(raw) {
                state.obtained_items.insert(id);
            } else {
                debug!(item = %raw, "Dropping unknown item from snapshot");
                dropped_items = dropped_items.saturating_add(1);
            }
        }

        let repaired = state.repair_invariants();
        RestoreReport {
            dropped_items,
            repaired,
        }
    }

    /// Encode as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::NonFinite`] if the size, a center, or the
    /// spawn holds NaN or an infinity, and [`SnapshotError::Json`] if
    /// serialization itself fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        self.check_finite()?;
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if the bytes are not a valid snapshot.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn check_finite(&self) -> Result<(), SnapshotError> {
        let spawn = self.initial_spawn_pos;
        let values = [
            ("borderSize", self.border_size),
            ("borderCenterX", self.border_center_x),
            ("borderCenterZ", self.border_center_z),
            ("initialSpawnPos.x", spawn.map(|p| p.x)),
            ("initialSpawnPos.y", spawn.map(|p| p.y)),
            ("initialSpawnPos.z", spawn.map(|p| p.z)),
        ];
        match values
            .into_iter()
            .find(|(_, value)| value.is_some_and(|v| !v.is_finite()))
        {
            Some((field, _)) => Err(SnapshotError::NonFinite { field }),
            None => Ok(()),
        }
    }
}

fn keep_or_replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
