//! Border geometry: sync across dimensions, first-join centering,
//! clamp-on-join, and resizing.
//!
//! Every function that changes size or center finishes with a sync so all
//! dimensions always show the same border.

use borders_types::{Dimension, PlayerId, Position};
use tracing::{debug, info, warn};

use crate::host::{BorderSink, Host, ScoreboardSink, WorldSink};
use crate::state::{CELL_SIZE, MIN_BORDER_SIZE, StateStore};

/// Result of a size change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOutcome {
    /// Diameter before the change.
    pub previous: f64,
    /// Diameter after the change.
    pub new_size: f64,
    /// Whether the floor clamp kicked in.
    pub clamped: bool,
}

/// Result of a player joining.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JoinOutcome {
    /// First join: the border was centered on this player's cell.
    Initialized {
        /// Border center, east-west.
        center_x: f64,
        /// Border center, north-south.
        center_z: f64,
    },
    /// The player was outside the border and was sent back to spawn.
    Clamped {
        /// Where the player was moved to.
        to: Position,
    },
    /// Nothing to do.
    Inside,
    /// The reported position was not finite and the join was ignored.
    Ignored,
}

/// Snap a horizontal coordinate to the center of its grid cell.
pub fn cell_center(coord: f64) -> f64 {
    (coord / CELL_SIZE).floor() * CELL_SIZE + CELL_SIZE / 2.0
}

/// Apply the same size and center to every dimension.
///
/// Unavailable dimensions are skipped. Returns how many were applied.
pub fn sync_all<B>(sink: &mut B, size: f64, center_x: f64, center_z: f64) -> usize
where
    B: BorderSink + ?Sized,
{
    let mut applied: usize = 0;
    for dimension in Dimension::ALL {
        match sink.set_border(dimension, size, center_x, center_z) {
            Ok(()) => applied = applied.saturating_add(1),
            Err(e) => debug!(%dimension, error = %e, "Skipping border sync"),
        }
    }
    applied
}

/// Push the state's current geometry to every dimension.
pub fn sync_state<B>(state: &StateStore, sink: &mut B) -> usize
where
    B: BorderSink + ?Sized,
{
    sync_all(
        sink,
        state.border_size,
        state.border_center_x,
        state.border_center_z,
    )
}

/// Whether `(x, z)` lies inside the border, bounds included.
pub fn contains(state: &StateStore, position: Position) -> bool {
    let half = state.border_size / 2.0;
    let within = |v: f64, center: f64| v >= center - half && v <= center + half;
    within(position.x, state.border_center_x) && within(position.z, state.border_center_z)
}

/// Handle a player joining at `position`.
///
/// The first join of the world initializes the border around that player.
/// Later joins only pull players back who are outside the border. A
/// position with a NaN or infinite coordinate changes nothing.
pub fn on_join<H>(
    state: &mut StateStore,
    host: &mut H,
    player: PlayerId,
    position: Position,
) -> JoinOutcome
where
    H: Host + ?Sized,
{
    if !position.is_finite() {
        warn!(%player, x = position.x, y = position.y, z = position.z, "Ignoring join at non-finite position");
        return JoinOutcome::Ignored;
    }
    if !state.border_initialized {
        return initialize(state, host, player, position);
    }
    clamp_on_join(state, host, player, position)
}

fn initialize<H>(
    state: &mut StateStore,
    host: &mut H,
    player: PlayerId,
    position: Position,
) -> JoinOutcome
where
    H: Host + ?Sized,
{
    let spawn = position.block_floor();
    let center_x = cell_center(spawn.x);
    let center_z = cell_center(spawn.z);

    state.initial_spawn_pos = Some(spawn);
    state.border_center_x = center_x;
    state.border_center_z = center_z;
    state.border_size = MIN_BORDER_SIZE;
    sync_state(state, host);

    host.teleport(player, Position::new(center_x, spawn.y, center_z));

    state.border_initialized = true;
    state.rebase_discovery_timer();

    info!(%player, center_x, center_z, size = state.border_size, "Border initialized");
    JoinOutcome::Initialized { center_x, center_z }
}

fn clamp_on_join<H>(
    state: &StateStore,
    host: &mut H,
    player: PlayerId,
    position: Position,
) -> JoinOutcome
where
    H: WorldSink + ?Sized,
{
    let Some(spawn) = state.initial_spawn_pos else {
        return JoinOutcome::Inside;
    };
    if contains(state, position) {
        return JoinOutcome::Inside;
    }

    let to = spawn.block_center();
    host.teleport(player, to);
    info!(%player, x = position.x, z = position.z, "Player joined outside border, returned to spawn");
    JoinOutcome::Clamped { to }
}

/// Change the diameter by a signed delta, sync, and refresh the label.
///
/// Shrinks stop at [`MIN_BORDER_SIZE`]; growth has no upper bound.
/// A non-finite delta leaves the border untouched.
pub fn resize<H>(state: &mut StateStore, host: &mut H, delta: f64) -> ResizeOutcome
where
    H: BorderSink + ScoreboardSink + ?Sized,
{
    let previous = state.border_size;
    if !delta.is_finite() {
        return ResizeOutcome {
            previous,
            new_size: previous,
            clamped: false,
        };
    }

    let mut new_size = previous + delta;
    let mut clamped = false;
    if delta < 0.0 && new_size < MIN_BORDER_SIZE {
        new_size = MIN_BORDER_SIZE;
        clamped = true;
    }

    state.border_size = new_size;
    sync_state(state, host);
    host.refresh_border_label(new_size);

    ResizeOutcome {
        previous,
        new_size,
        clamped,
    }
}

/// Return the border to its initial size, recentered on the recorded spawn.
///
/// Without a recorded spawn the center is left where it is.
pub fn reset_geometry<B>(state: &mut StateStore, sink: &mut B)
where
    B: BorderSink + ?Sized,
{
    if let Some(spawn) = state.initial_spawn_pos {
        state.border_center_x = cell_center(spawn.x);
        state.border_center_z = cell_center(spawn.z);
    }
    state.border_size = MIN_BORDER_SIZE;
    sync_state(state, sink);
}
