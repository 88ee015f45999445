//! Death-driven border shrink.

use borders_types::{Notification, PlayerId};
use tracing::{debug, info};

use crate::border::{self, ResizeOutcome};
use crate::host::Host;
use crate::state::StateStore;

/// Shrink the border because `player` died.
///
/// Only acts while the border is initialized, the game is running, and
/// death shrink is enabled with a positive amount. Returns `None` when
/// nothing happened. The inactivity timer is never touched.
pub fn handle_death<H>(state: &mut StateStore, host: &mut H, player: PlayerId) -> Option<ResizeOutcome>
where
    H: Host + ?Sized,
{
    if !state.border_initialized || !state.game_active || !state.death_shrink_enabled {
        debug!(%player, "Death ignored");
        return None;
    }
    let delta = state.death_shrink_diameter()?;

    let outcome = border::resize(state, host, -delta);
    host.notify(Notification::DeathShrink {
        player,
        new_size: outcome.new_size,
    });

    info!(
        %player,
        previous = outcome.previous,
        new_size = outcome.new_size,
        clamped = outcome.clamped,
        "Border shrunk after death"
    );
    Some(outcome)
}
