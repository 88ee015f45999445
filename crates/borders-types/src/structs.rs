//! Value structs exchanged between the coordinator and its host.

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, PlayerId};

/// A point in world space. `y` is vertical.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
}

impl Position {
    /// Create a position from its three coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Return the position of the block containing this point
    /// (every coordinate floored).
    pub fn block_floor(self) -> Self {
        Self {
            x: self.x.floor(),
            y: self.y.floor(),
            z: self.z.floor(),
        }
    }

    /// Whether every coordinate is a finite number.
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Return the center of this block on the horizontal plane, keeping
    /// the vertical coordinate unchanged.
    pub fn block_center(self) -> Self {
        let block = self.block_floor();
        Self {
            x: block.x + 0.5,
            y: block.y,
            z: block.z + 0.5,
        }
    }
}

/// A message the coordinator asks the host to broadcast to players.
///
/// The coordinator only decides *that* something happened; wording and
/// flavor text are the host's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// A player obtained an item nobody had obtained before.
    ItemDiscovered {
        /// The discovering player.
        player: PlayerId,
        /// The newly discovered item.
        item: ItemId,
    },

    /// The inactivity failsafe expanded the border.
    FailsafeExpanded {
        /// Border diameter after the expansion.
        new_size: f64,
        /// Ticks that had elapsed since the previous discovery.
        idle_ticks: u64,
    },

    /// A player's death shrank the border.
    DeathShrink {
        /// The player who died.
        player: PlayerId,
        /// Border diameter after the shrink (already clamped).
        new_size: f64,
    },
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn block_floor_handles_negative_coordinates() {
        let pos = Position::new(-0.25, 64.9, 15.99).block_floor();
        assert_eq!(pos, Position::new(-1.0, 64.0, 15.0));
    }

    #[test]
    fn non_finite_coordinates_are_detected() {
        assert!(Position::new(1.0, 64.0, -2.0).is_finite());
        assert!(!Position::new(f64::NAN, 64.0, 0.0).is_finite());
        assert!(!Position::new(0.0, f64::NEG_INFINITY, 0.0).is_finite());
    }

    #[test]
    fn block_center_offsets_horizontal_axes_only() {
        let pos = Position::new(10.7, 70.2, -3.1).block_center();
        assert_eq!(pos.x, 10.5);
        assert_eq!(pos.y, 70.0);
        assert_eq!(pos.z, -3.5);
    }

    #[test]
    fn notification_is_tagged_by_kind() {
        let note = Notification::FailsafeExpanded {
            new_size: 18.0,
            idle_ticks: 6000,
        };
        let json = serde_json::to_value(&note).ok();
        let kind = json
            .as_ref()
            .and_then(|v| v.get("kind"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(kind, Some("failsafe_expanded"));
    }
}
