//! In-memory host world.
//!
//! Stands in for a game server: named players with positions and slot
//! inventories, one border per loaded dimension, a score table, and a
//! border-size label. Chat and scoreboard output go to `tracing` under the
//! `borders::chat` and `borders::scoreboard` targets.

use std::collections::{BTreeMap, BTreeSet};

use borders_core::host::{BorderSink, NotificationSink, ScoreboardSink, WorldSink};
use borders_core::{InventoryCounts, SinkUnavailable, inventory};
use borders_types::{Dimension, ItemId, Notification, PlayerId, Position};
use tracing::{debug, info};

/// Most items a single inventory slot holds.
pub const STACK_SIZE: u32 = 64;

/// Border geometry as last applied to a dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderGeometry {
    /// Diameter.
    pub size: f64,
    /// Center, east-west.
    pub center_x: f64,
    /// Center, north-south.
    pub center_z: f64,
}

/// A player the world has seen.
#[derive(Debug, Clone)]
pub struct SimPlayer {
    /// Display name.
    pub name: String,
    /// Current position in the overworld.
    pub position: Position,
    /// Inventory slots, each at most [`STACK_SIZE`].
    pub slots: Vec<(ItemId, u32)>,
}

/// The headless world.
#[derive(Debug, Default)]
pub struct SimulatedWorld {
    players: BTreeMap<PlayerId, SimPlayer>,
    names: BTreeMap<String, PlayerId>,
    online: Vec<PlayerId>,
    loaded: BTreeSet<Dimension>,
    borders: BTreeMap<Dimension, BorderGeometry>,
    scores: BTreeMap<PlayerId, u32>,
    border_label: Option<f64>,
}

impl SimulatedWorld {
    /// Create a world with the given dimensions loaded.
    pub fn new(dimensions: &[Dimension]) -> Self {
        Self {
            loaded: dimensions.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Bring a player online at `position`. A returning name keeps its id
    /// and inventory.
    pub fn join(&mut self, name: &str, position: Position) -> PlayerId {
        let id = match self.names.get(name) {
            Some(&id) => id,
            None => {
                let id = PlayerId::new();
                self.names.insert(name.to_owned(), id);
                self.players.insert(
                    id,
                    SimPlayer {
                        name: name.to_owned(),
                        position,
                        slots: Vec::new(),
                    },
                );
                id
            }
        };
        if let Some(player) = self.players.get_mut(&id) {
            player.position = position;
        }
        if !self.online.contains(&id) {
            self.online.push(id);
        }
        id
    }

    /// Take a player offline. Returns their id if they were online.
    pub fn leave(&mut self, name: &str) -> Option<PlayerId> {
        let id = self.online_id(name)?;
        self.online.retain(|p| *p != id);
        Some(id)
    }

    /// Id of an online player.
    pub fn online_id(&self, name: &str) -> Option<PlayerId> {
        self.names
            .get(name)
            .copied()
            .filter(|id| self.online.contains(id))
    }

    /// Add `count` of `item` to an online player, filling partial stacks
    /// first. Returns the player's id, or `None` if they are not online.
    pub fn give(&mut self, name: &str, item: &ItemId, count: u32) -> Option<PlayerId> {
        let id = self.online_id(name)?;
        let player = self.players.get_mut(&id)?;

        let mut left = count;
        for (slot_item, slot_count) in &mut player.slots {
            if left == 0 {
                break;
            }
            if slot_item == item && *slot_count < STACK_SIZE {
                let moved = left.min(STACK_SIZE.saturating_sub(*slot_count));
                *slot_count = slot_count.saturating_add(moved);
                left = left.saturating_sub(moved);
            }
        }
        while left > 0 {
            let moved = left.min(STACK_SIZE);
            player.slots.push((item.clone(), moved));
            left = left.saturating_sub(moved);
        }
        Some(id)
    }

    /// A player's record, online or not.
    pub fn player(&self, id: PlayerId) -> Option<&SimPlayer> {
        self.players.get(&id)
    }

    /// Border last applied to `dimension`.
    pub fn border(&self, dimension: Dimension) -> Option<BorderGeometry> {
        self.borders.get(&dimension).copied()
    }

    /// A player's discovery score.
    pub fn score(&self, id: PlayerId) -> u32 {
        self.scores.get(&id).copied().unwrap_or(0)
    }

    /// Size shown on the border label, once drawn.
    pub const fn border_label(&self) -> Option<f64> {
        self.border_label
    }

    fn name_of(&self, id: PlayerId) -> String {
        self.players
            .get(&id)
            .map_or_else(|| id.to_string(), |p| p.name.clone())
    }
}

impl BorderSink for SimulatedWorld {
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
        self.borders.insert(
            dimension,
            BorderGeometry {
                size,
                center_x,
                center_z,
            },
        );
        Ok(())
    }
}

impl WorldSink for SimulatedWorld {
    fn online_players(&self) -> Vec<PlayerId> {
        self.online.clone()
    }

    fn scan_inventory(&self, player: PlayerId) -> InventoryCounts {
        self.players
            .get(&player)
            .map(|p| inventory::total_counts(p.slots.iter().cloned()))
            .unwrap_or_default()
    }

    fn teleport(&mut self, player: PlayerId, position: Position) {
        if let Some(p) = self.players.get_mut(&player) {
            p.position = position;
            debug!(player = %p.name, x = position.x, y = position.y, z = position.z, "Teleported");
        }
    }

    fn clear_inventory(&mut self, player: PlayerId) {
        if let Some(p) = self.players.get_mut(&player) {
            p.slots.clear();
        }
    }
}

impl NotificationSink for SimulatedWorld {
    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::ItemDiscovered { player, item } => {
                info!(target: "borders::chat", player = %self.name_of(player), %item, "Found a new item");
            }
            Notification::FailsafeExpanded {
                new_size,
                idle_ticks,
            } => {
                info!(target: "borders::chat", new_size, idle_ticks, "No new items for a while, the border grows");
            }
            Notification::DeathShrink { player, new_size } => {
                info!(target: "borders::chat", player = %self.name_of(player), new_size, "A death shrinks the border");
            }
        }
    }
}

impl ScoreboardSink for SimulatedWorld {
    fn add_score(&mut self, player: PlayerId, points: u32) {
        let score = self.scores.entry(player).or_insert(0);
        *score = score.saturating_add(points);
        let score = *score;
        debug!(target: "borders::scoreboard", player = %self.name_of(player), score, "Score updated");
    }

    fn refresh_border_label(&mut self, size: f64) {
        self.border_label = Some(size);
        debug!(target: "borders::scoreboard", size, "Border label refreshed");
    }

    fn reset_scores(&mut self) {
        self.scores.clear();
        debug!(target: "borders::scoreboard", "Scores reset");
    }
}
