//! The seams between the coordinator and the game host.
//!
//! The coordinator never touches a world directly. Everything it needs from
//! the host (who is online, what they carry, where the border is drawn, how
//! players are told about events) goes through the traits in this module.
//! A host implements all four sinks on one type and gets [`Host`] for free.

use borders_types::{Dimension, ItemId, Notification, PlayerId, Position};

use crate::state::InventoryCounts;

/// A dimension's border could not be applied because the dimension is not
/// loaded. Sync skips it and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("dimension {dimension} is not available")]
pub struct SinkUnavailable {
    /// The dimension that was skipped.
    pub dimension: Dimension,
}

/// Per-dimension border control.
pub trait BorderSink {
    /// Set the border of `dimension` to the given diameter and center.
    ///
    /// # Errors
    ///
    /// Returns [`SinkUnavailable`] if the dimension is not loaded.
    fn set_border(
        &mut self,
        dimension: Dimension,
        size: f64,
        center_x: f64,
        center_z: f64,
    ) -> Result<(), SinkUnavailable>;
}

/// Player roster, inventories, and movement.
pub trait WorldSink {
    /// Players currently online, in the order they should be processed.
    fn online_players(&self) -> Vec<PlayerId>;

    /// Total count per item across every slot of the player's inventory.
    /// Empty slots are omitted.
    fn scan_inventory(&self, player: PlayerId) -> InventoryCounts;

    /// Move a player to a position in the overworld.
    fn teleport(&mut self, player: PlayerId, position: Position);

    /// Empty a player's inventory.
    fn clear_inventory(&mut self, player: PlayerId);
}

/// Player-facing announcements.
pub trait NotificationSink {
    /// Broadcast a notification to every online player.
    fn notify(&mut self, notification: Notification);
}

/// The per-player discovery scoreboard and the border-size sidebar line.
pub trait ScoreboardSink {
    /// Add `points` to a player's discovery score.
    fn add_score(&mut self, player: PlayerId, points: u32);

    /// Redraw the line showing the current border size.
    fn refresh_border_label(&mut self, size: f64);

    /// Zero every player's score.
    fn reset_scores(&mut self);
}

/// Everything the coordinator needs from a host.
pub trait Host: BorderSink + WorldSink + NotificationSink + ScoreboardSink {}

impl<T> Host for T where T: BorderSink + WorldSink + NotificationSink + ScoreboardSink + ?Sized {}

/// Resolves stored item identifiers against the host's item registry.
///
/// Snapshot restore drops identifiers that no longer resolve.
pub trait ItemRegistry {
    /// Return the canonical identifier for `raw`, or `None` if the host does
    /// not know the item.
    fn resolve(&self, raw: &str) -> Option<ItemId>;
}

/// Byte-level storage for the persisted snapshot.
///
/// Encoding lives in [`crate::snapshot`]; implementations only move bytes.
pub trait SnapshotStore {
    /// Error type produced by the backing storage.
    type Error: std::error::Error;

    /// Read the stored snapshot. `Ok(None)` means nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the snapshot exists but cannot be read.
    fn read(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Replace the stored snapshot with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write does not complete.
    fn write(&self, bytes: &[u8]) -> Result<(), Self::Error>;
}
