//! Operator commands.
//!
//! Hosts parse their own command syntax into [`Command`] and hand it to
//! [`apply`]. Arguments are validated before anything changes, so a
//! rejected command leaves the state exactly as it was.

use serde::Serialize;
use tracing::info;

use crate::border::{self, ResizeOutcome};
use crate::host::Host;
use crate::state::StateStore;

/// A typed operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start tracking discoveries and arm the failsafe.
    Start,
    /// Stop tracking discoveries and disarm the failsafe.
    Stop,
    /// Set the failsafe delay in seconds and restart the countdown.
    SetTimer {
        /// Delay in seconds.
        seconds: u64,
    },
    /// Set the per-side discovery growth. Must be at least 1.
    SetGrowth {
        /// Blocks per side.
        per_side: i32,
    },
    /// Grow the border by hand. Must be at least 1.
    Grow {
        /// Blocks per side.
        per_side: i32,
    },
    /// Shrink the border by hand. Must be at least 1.
    Shrink {
        /// Blocks per side.
        per_side: i32,
    },
    /// Reset the game to its starting state.
    Reset,
    /// Report the current status.
    Info,
    /// Toggle the failsafe without touching anything else.
    SetFailsafe {
        /// New failsafe flag.
        enabled: bool,
    },
    /// Toggle death shrink, optionally setting its amount.
    SetDeathShrink {
        /// New death-shrink flag.
        enabled: bool,
        /// Blocks per side, at least 1 when given.
        per_side: Option<i32>,
    },
    /// Set how many upcoming discoveries are recorded silently.
    SetBacklog {
        /// Discoveries to absorb.
        count: u32,
    },
}

/// What a successful command did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The game is running.
    Started,
    /// The game is stopped.
    Stopped,
    /// The failsafe delay changed.
    TimerSet {
        /// Delay in ticks.
        delay_ticks: u64,
    },
    /// The discovery growth changed.
    GrowthSet {
        /// Blocks per side.
        per_side: i32,
    },
    /// The border was resized by hand.
    Resized(ResizeOutcome),
    /// The game was reset.
    Reset,
    /// Status report.
    Info(BorderInfo),
    /// The failsafe flag changed.
    FailsafeSet {
        /// New flag.
        enabled: bool,
    },
    /// Death shrink settings changed.
    DeathShrinkSet {
        /// New flag.
        enabled: bool,
        /// Blocks per side in effect.
        per_side: i32,
    },
    /// The backlog changed.
    BacklogSet {
        /// Discoveries to absorb.
        count: u32,
    },
}

/// Read-only status snapshot returned by [`Command::Info`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderInfo {
    /// Whether discoveries are tracked.
    pub game_active: bool,
    /// Whether the failsafe may fire.
    pub failsafe_enabled: bool,
    /// Whether the border has been initialized.
    pub border_initialized: bool,
    /// Border diameter.
    pub size: f64,
    /// Border center, east-west.
    pub center_x: f64,
    /// Border center, north-south.
    pub center_z: f64,
    /// Distinct items discovered.
    pub discovered: usize,
    /// Blocks per side per discovery.
    pub growth_per_side: i32,
    /// Failsafe delay in whole seconds.
    pub failsafe_delay_seconds: u64,
    /// Whole seconds since the last discovery or rebase.
    pub seconds_since_discovery: u64,
    /// Whether deaths shrink the border.
    pub death_shrink_enabled: bool,
    /// Blocks per side per death.
    pub death_shrink_per_side: i32,
    /// Discoveries still absorbed silently.
    pub backlog_remaining: u32,
}

impl BorderInfo {
    /// Build a report from the current state.
    pub fn from_state(state: &StateStore, ticks_per_second: u32) -> Self {
        let tps = u64::from(ticks_per_second.max(1));
        Self {
            game_active: state.game_active,
            failsafe_enabled: state.failsafe_enabled,
            border_initialized: state.border_initialized,
            size: state.border_size,
            center_x: state.border_center_x,
            center_z: state.border_center_z,
            discovered: state.obtained_items.len(),
            growth_per_side: state.discovery_growth_per_side,
            failsafe_delay_seconds: state.failsafe_delay_ticks.checked_div(tps).unwrap_or(0),
            seconds_since_discovery: state.idle_ticks().checked_div(tps).unwrap_or(0),
            death_shrink_enabled: state.death_shrink_enabled,
            death_shrink_per_side: state.death_shrink_per_side,
            backlog_remaining: state.ignored_discoveries_remaining,
        }
    }
}

/// Errors returned for rejected commands. State is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// An argument is out of range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Argument name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The border must be initialized (someone must have joined) first.
    #[error("border is not initialized yet")]
    BorderNotInitialized,
}

/// Apply `command` to the state.
///
/// # Errors
///
/// Returns [`CommandError::InvalidArgument`] for out-of-range arguments and
/// [`CommandError::BorderNotInitialized`] for a manual resize before the
/// first join.
pub fn apply<H>(
    state: &mut StateStore,
    host: &mut H,
    command: Command,
    ticks_per_second: u32,
) -> Result<CommandOutcome, CommandError>
where
    H: Host + ?Sized,
{
    let outcome = match command {
        Command::Start => {
            state.game_active = true;
            state.failsafe_enabled = true;
            state.rebase_discovery_timer();
            host.refresh_border_label(state.border_size);
            CommandOutcome::Started
        }
        Command::Stop => {
            state.game_active = false;
            state.failsafe_enabled = false;
            CommandOutcome::Stopped
        }
        Command::SetTimer { seconds } => {
            let delay_ticks = seconds
                .checked_mul(u64::from(ticks_per_second))
                .ok_or_else(|| CommandError::InvalidArgument {
                    name: "seconds",
                    reason: format!("{seconds} seconds overflows the tick counter"),
                })?;
            state.failsafe_delay_ticks = delay_ticks;
            state.rebase_discovery_timer();
            CommandOutcome::TimerSet { delay_ticks }
        }
        Command::SetGrowth { per_side } => {
            require_positive("per_side", per_side)?;
            state.discovery_growth_per_side = per_side;
            CommandOutcome::GrowthSet { per_side }
        }
        Command::Grow { per_side } => {
            CommandOutcome::Resized(manual_resize(state, host, per_side, 1.0)?)
        }
        Command::Shrink { per_side } => {
            CommandOutcome::Resized(manual_resize(state, host, per_side, -1.0)?)
        }
        Command::Reset => {
            reset(state, host);
            CommandOutcome::Reset
        }
        Command::Info => CommandOutcome::Info(BorderInfo::from_state(state, ticks_per_second)),
        Command::SetFailsafe { enabled } => {
            state.failsafe_enabled = enabled;
            CommandOutcome::FailsafeSet { enabled }
        }
        Command::SetDeathShrink { enabled, per_side } => {
            if let Some(per_side) = per_side {
                require_positive("per_side", per_side)?;
                state.death_shrink_per_side = per_side;
            }
            state.death_shrink_enabled = enabled;
            CommandOutcome::DeathShrinkSet {
                enabled,
                per_side: state.death_shrink_per_side,
            }
        }
        Command::SetBacklog { count } => {
            state.ignored_discoveries_remaining = count;
            CommandOutcome::BacklogSet { count }
        }
    };

    if !matches!(outcome, CommandOutcome::Info(_)) {
        info!(?command, "Command applied");
    }
    Ok(outcome)
}

fn require_positive(name: &'static str, value: i32) -> Result<(), CommandError> {
    if value < 1 {
        return Err(CommandError::InvalidArgument {
            name,
            reason: format!("must be at least 1, got {value}"),
        });
    }
    Ok(())
}

fn manual_resize<H>(
    state: &mut StateStore,
    host: &mut H,
    per_side: i32,
    sign: f64,
) -> Result<ResizeOutcome, CommandError>
where
    H: Host + ?Sized,
{
    require_positive("per_side", per_side)?;
    if !state.border_initialized {
        return Err(CommandError::BorderNotInitialized);
    }
    Ok(border::resize(state, host, sign * f64::from(per_side) * 2.0))
}

/// Return the game to its starting state.
///
/// Rules configured by the operator (delay, growth, death shrink, backlog)
/// are kept.
fn reset<H>(state: &mut StateStore, host: &mut H)
where
    H: Host + ?Sized,
{
    border::reset_geometry(state, host);

    state.obtained_items.clear();
    state.last_inventory_snapshot.clear();
    state.global_tick = 0;
    state.last_discovery_tick = 0;
    state.game_active = false;
    state.failsafe_enabled = false;

    host.reset_scores();
    host.refresh_border_label(state.border_size);

    let spawn = state.initial_spawn_pos.map(borders_types::Position::block_center);
    for player in host.online_players() {
        host.clear_inventory(player);
        if let Some(spawn) = spawn {
            host.teleport(player, spawn);
        }
    }
}
