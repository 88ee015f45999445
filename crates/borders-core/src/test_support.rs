//! In-memory host and snapshot store for unit tests.

#![allow(clippy::panic, clippy::missing_const_for_fn)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use borders_types::{Dimension, ItemId, Notification, PlayerId, Position};

use crate::host::{
    BorderSink, NotificationSink, ScoreboardSink, SinkUnavailable, SnapshotStore, WorldSink,
};
use crate::state::{InventoryCounts, StateStore};

/// State with the border initialized around spawn `(0, 64, 0)`.
pub fn initialized_state() -> StateStore {
    StateStore {
        border_initialized: true,
        border_size: 16.0,
        border_center_x: 8.0,
        border_center_z: 8.0,
        initial_spawn_pos: Some(Position::new(0.0, 64.0, 0.0)),
        ..StateStore::default()
    }
}

/// Host that records every call made through the sink traits.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub players: Vec<PlayerId>,
    pub inventories: BTreeMap<PlayerId, InventoryCounts>,
    pub unavailable: BTreeSet<Dimension>,
    pub borders: BTreeMap<Dimension, (f64, f64, f64)>,
    pub notifications: Vec<Notification>,
    pub scores: BTreeMap<PlayerId, u32>,
    pub labels: Vec<f64>,
    pub teleports: Vec<(PlayerId, Position)>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self) -> PlayerId {
        let player = PlayerId::new();
        self.players.push(player);
        player
    }

    pub fn remove_player(&mut self, player: PlayerId) {
        self.players.retain(|p| *p != player);
    }

    pub fn unload(&mut self, dimension: Dimension) {
        self.unavailable.insert(dimension);
    }

    pub fn give(&mut self, player: PlayerId, raw: &str, count: u32) {
        let item = ItemId::parse(raw).unwrap_or_else(|e| panic!("bad test item {raw}: {e}"));
        let slot = self
            .inventories
            .entry(player)
            .or_default()
            .entry(item)
            .or_insert(0);
        *slot = slot.saturating_add(count);
    }

    pub fn inventory(&self, player: PlayerId) -> InventoryCounts {
        self.inventories.get(&player).cloned().unwrap_or_default()
    }
}

impl BorderSink for RecordingHost {
    fn set_border(
        &mut self,
        dimension: Dimension,
        size: f64,
        center_x: f64,
        center_z: f64,
    ) -> Result<(), SinkUnavailable> {
        if self.unavailable.contains(&dimension) {
            return Err(SinkUnavailable { dimension });
        }
        self.borders.insert(dimension, (size, center_x, center_z));
        Ok(())
    }
}

impl WorldSink for RecordingHost {
    fn online_players(&self) -> Vec<PlayerId> {
        self.players.clone()
    }

    fn scan_inventory(&self, player: PlayerId) -> InventoryCounts {
        self.inventory(player)
    }

    fn teleport(&mut self, player: PlayerId, position: Position) {
        self.teleports.push((player, position));
    }

    fn clear_inventory(&mut self, player: PlayerId) {
        self.inventories.remove(&player);
    }
}

impl NotificationSink for RecordingHost {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

impl ScoreboardSink for RecordingHost {
    fn add_score(&mut self, player: PlayerId, points: u32) {
        let score = self.scores.entry(player).or_insert(0);
        *score = score.saturating_add(points);
    }

    fn refresh_border_label(&mut self, size: f64) {
        self.labels.push(size);
    }

    fn reset_scores(&mut self) {
        self.scores.clear();
    }
}

#[derive(Debug, thiserror::Error)]
#[error("memory store is unavailable")]
pub struct MemoryStoreError;

/// Snapshot store backed by a byte buffer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bytes: RefCell<Option<Vec<u8>>>,
    failing: bool,
}

impl MemoryStore {
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: RefCell::new(Some(bytes)),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            bytes: RefCell::new(None),
            failing: true,
        }
    }
}

impl SnapshotStore for MemoryStore {
    type Error = MemoryStoreError;

    fn read(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        if self.failing {
            return Err(MemoryStoreError);
        }
        Ok(self.bytes.borrow().clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.failing {
            return Err(MemoryStoreError);
        }
        *self.bytes.borrow_mut() = Some(bytes.to_vec());
        Ok(())
    }
}
