//! Border state coordinator for the Borders game mode.
//!
//! The play area is a square border that starts at 16 blocks around the
//! first player's spawn. It grows whenever somebody obtains an item nobody
//! has had before, grows on its own after a stretch of inactivity, and
//! shrinks when players die.
//!
//! This crate holds the state, the policies, and the [`Coordinator`] that
//! drives them. It performs no I/O of its own: hosts plug in through the
//! traits in [`host`].
//!
//! # Modules
//!
//! - [`state`] -- the single mutable state record
//! - [`border`] -- sync across dimensions, first-join centering, resizing
//! - [`inventory`] -- per-tick inventory diffing
//! - [`discovery`] -- discovery-driven growth with backlog suppression
//! - [`failsafe`] -- inactivity expansion
//! - [`death`] -- death-driven shrink
//! - [`commands`] -- operator commands
//! - [`snapshot`] -- persisted JSON form of the state
//! - [`coordinator`] -- event entry points for the host
//! - [`config`] -- YAML configuration
//! - [`host`] / [`registry`] -- host-facing traits and stock registries

pub mod border;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod death;
pub mod discovery;
pub mod failsafe;
pub mod host;
pub mod inventory;
pub mod registry;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod test_support;

pub use border::{JoinOutcome, ResizeOutcome};
pub use commands::{BorderInfo, Command, CommandError, CommandOutcome};
pub use config::{BordersConfig, ConfigError};
pub use coordinator::{Coordinator, DiscoveryEvent, StartupOutcome, TickSummary};
pub use discovery::DiscoveryOutcome;
pub use host::{
    BorderSink, Host, ItemRegistry, NotificationSink, ScoreboardSink, SinkUnavailable,
    SnapshotStore, WorldSink,
};
pub use registry::{KnownItems, OpenRegistry};
pub use snapshot::{BordersSnapshot, RestoreReport, SnapshotError};
pub use state::{InventoryCounts, MIN_BORDER_SIZE, StateStore};
