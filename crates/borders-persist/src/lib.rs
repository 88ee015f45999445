//! Durable snapshot storage for the Borders coordinator.
//!
//! The coordinator encodes its state to JSON bytes; this crate decides
//! where those bytes live. [`FileSnapshotStore`] keeps them in a single
//! file (by default `config/borders_state.json`) and replaces it atomically
//! on every save.
//!
//! # Modules
//!
//! - [`file_store`] -- Atomic single-file snapshot store
//! - [`error`] -- Path-annotated filesystem errors

pub mod error;
pub mod file_store;

pub use error::PersistError;
pub use file_store::FileSnapshotStore;
