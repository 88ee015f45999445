//! Discovery-driven border growth.

use borders_types::{ItemId, Notification, PlayerId};
use tracing::{debug, info};

use crate::border;
use crate::host::Host;
use crate::state::StateStore;

/// What a single discovery did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscoveryOutcome {
    /// Someone had already obtained this item; nothing changed.
    AlreadyKnown,
    /// Recorded silently against the backlog.
    Suppressed {
        /// Backlog left after this one.
        remaining: u32,
    },
    /// Recorded, announced, and scored.
    Recorded {
        /// New border diameter, if the border grew.
        grew_to: Option<f64>,
    },
}

/// Process one item that `player` just picked up.
///
/// While backlog remains, the item is only recorded. Otherwise it is
/// announced, scored, the inactivity timer restarts, and the border grows
/// (once initialized, and only for a positive growth setting).
pub fn handle_discovery<H>(
    state: &mut StateStore,
    host: &mut H,
    player: PlayerId,
    item: &ItemId,
) -> DiscoveryOutcome
where
    H: Host + ?Sized,
{
    if state.obtained_items.contains(item) {
        return DiscoveryOutcome::AlreadyKnown;
    }

    if state.ignored_discoveries_remaining > 0 {
        state.ignored_discoveries_remaining = state.ignored_discoveries_remaining.saturating_sub(1);
        state.obtained_items.insert(item.clone());
        let remaining = state.ignored_discoveries_remaining;
        debug!(%player, %item, remaining, "Discovery absorbed by backlog");
        return DiscoveryOutcome::Suppressed { remaining };
    }

    state.obtained_items.insert(item.clone());
    host.notify(Notification::ItemDiscovered {
        player,
        item: item.clone(),
    });
    host.add_score(player, 1);
    state.rebase_discovery_timer();

    let grew_to = match state.discovery_growth_diameter() {
        Some(delta) if state.border_initialized => {
            Some(border::resize(state, host, delta).new_size)
        }
        _ => None,
    };

    info!(
        %player,
        %item,
        discovered = state.obtained_items.len(),
        ?grew_to,
        "Item discovered"
    );
    DiscoveryOutcome::Recorded { grew_to }
}
