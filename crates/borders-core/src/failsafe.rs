//! Inactivity failsafe.
//!
//! Evaluated once per tick after discoveries. If nobody has discovered
//! anything for `failsafe_delay_ticks`, the border grows as if they had.
//! The check is level-triggered against `last_discovery_tick`, so a long
//! stall fires once and then restarts the countdown.

use borders_types::Notification;
use tracing::info;

use crate::border::{self, ResizeOutcome};
use crate::host::Host;
use crate::state::StateStore;

/// Whether every precondition for the failsafe holds this tick.
pub const fn is_due(state: &StateStore) -> bool {
    state.border_initialized
        && state.game_active
        && state.failsafe_enabled
        && state.idle_ticks() >= state.failsafe_delay_ticks
}

/// Expand the border if the failsafe is due. Returns `None` otherwise.
///
/// A non-positive growth setting disables the failsafe entirely; the timer
/// is not rebased either.
pub fn evaluate<H>(state: &mut StateStore, host: &mut H) -> Option<ResizeOutcome>
where
    H: Host + ?Sized,
{
    if !is_due(state) {
        return None;
    }
    let delta = state.discovery_growth_diameter()?;
    let idle_ticks = state.idle_ticks();

    let outcome = border::resize(state, host, delta);
    state.rebase_discovery_timer();
    host.notify(Notification::FailsafeExpanded {
        new_size: outcome.new_size,
        idle_ticks,
    });

    info!(
        tick = state.global_tick,
        idle_ticks,
        new_size = outcome.new_size,
        "Failsafe expanded border"
    );
    Some(outcome)
}
