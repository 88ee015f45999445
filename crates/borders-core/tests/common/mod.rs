//! Shared host double for `borders-core` integration tests.
//!
//! Unlike the unit-test recorder, this world tracks player positions so a
//! teleport actually moves the player, which lets scenarios check where
//! people end up.

#![allow(dead_code, clippy::unwrap_used, clippy::missing_const_for_fn)]

use std::cell::RefCell;
use std::collections::BTreeMap;

use borders_core::host::{BorderSink, NotificationSink, ScoreboardSink, SnapshotStore, WorldSink};
use borders_core::{InventoryCounts, SinkUnavailable};
use borders_types::{Dimension, ItemId, Notification, PlayerId, Position};

/// One online player.
#[derive(Debug, Clone)]
pub struct TestPlayer {
    pub name: String,
    pub position: Position,
    pub inventory: InventoryCounts,
}

/// In-memory world implementing every host sink.
#[derive(Debug)]
pub struct TestWorld {
    pub players: BTreeMap<PlayerId, TestPlayer>,
    pub order: Vec<PlayerId>,
    pub loaded: Vec<Dimension>,
    pub borders: BTreeMap<Dimension, (f64, f64, f64)>,
    pub notifications: Vec<Notification>,
    pub scores: BTreeMap<PlayerId, u32>,
    pub label: Option<f64>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self {
            players: BTreeMap::new(),
            order: Vec::new(),
            loaded: Dimension::ALL.to_vec(),
            borders: BTreeMap::new(),
            notifications: Vec::new(),
            scores: BTreeMap::new(),
            label: None,
        }
    }
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, name: &str, position: Position) -> PlayerId {
        let id = PlayerId::new();
        self.players.insert(
            id,
            TestPlayer {
                name: name.to_owned(),
                position,
                inventory: InventoryCounts::new(),
            },
        );
        self.order.push(id);
        id
    }

    pub fn give(&mut self, player: PlayerId, raw: &str, count: u32) {
        let item = ItemId::parse(raw).unwrap();
        let entry = self
            .players
            .get_mut(&player)
            .unwrap()
            .inventory
            .entry(item)
            .or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn position(&self, player: PlayerId) -> Position {
        self.players.get(&player).unwrap().position
    }

    pub fn border(&self, dimension: Dimension) -> Option<(f64, f64, f64)> {
        self.borders.get(&dimension).copied()
    }

    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores.get(&player).copied().unwrap_or(0)
    }
}

impl BorderSink for TestWorld {
    fn set_border(
        &mut self,
        dimension: Dimension,
        size: f64,
        center_x: f64,
        center_z: f64,
    ) -> Result<(), SinkUnavailable> {
        if !self.loaded.contains(&dimension) {
            return Err(SinkUnavailable { dimension });
        }
        self.borders.insert(dimension, (size, center_x, center_z));
        Ok(())
    }
}

impl WorldSink for TestWorld {
    fn online_players(&self) -> Vec<PlayerId> {
        self.order.clone()
    }

    fn scan_inventory(&self, player: PlayerId) -> InventoryCounts {
        self.players
            .get(&player)
            .map(|p| p.inventory.clone())
            .unwrap_or_default()
    }

    fn teleport(&mut self, player: PlayerId, position: Position) {
        if let Some(p) = self.players.get_mut(&player) {
            p.position = position;
        }
    }

    fn clear_inventory(&mut self, player: PlayerId) {
        if let Some(p) = self.players.get_mut(&player) {
            p.inventory.clear();
        }
    }
}

impl NotificationSink for TestWorld {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

impl ScoreboardSink for TestWorld {
    fn add_score(&mut self, player: PlayerId, points: u32) {
        let score = self.scores.entry(player).or_insert(0);
        *score = score.saturating_add(points);
    }

    fn refresh_border_label(&mut self, size: f64) {
        self.label = Some(size);
    }

    fn reset_scores(&mut self) {
        self.scores.clear();
    }
}

/// Snapshot store holding bytes in memory.
#[derive(Debug, Default)]
pub struct BytesStore {
    pub bytes: RefCell<Option<Vec<u8>>>,
}

impl BytesStore {
    pub fn holding(bytes: &[u8]) -> Self {
        Self {
            bytes: RefCell::new(Some(bytes.to_vec())),
        }
    }
}

impl SnapshotStore for BytesStore {
    type Error = std::io::Error;

    fn read(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.bytes.borrow().clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), Self::Error> {
        *self.bytes.borrow_mut() = Some(bytes.to_vec());
        Ok(())
    }
}
