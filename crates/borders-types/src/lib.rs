//! Shared type definitions for the Borders coordinator.
//!
//! This crate holds the identifiers and value types that cross the boundary
//! between the coordinator core, the persistence layer, and whatever host
//! drives the game (the headless engine binary, or a real game server).
//!
//! # Modules
//!
//! - [`ids`] -- Player identifiers (UUID) and namespaced item identifiers
//! - [`enums`] -- Dimensions that carry a world border
//! - [`structs`] -- Positions and outbound notifications

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::Dimension;
pub use ids::{DEFAULT_NAMESPACE, ItemId, ItemIdError, PlayerId};
pub use structs::{Notification, Position};
