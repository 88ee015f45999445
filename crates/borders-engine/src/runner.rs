//! Single-writer session loop.
//!
//! [`run`] owns the coordinator and world for the lifetime of the process.
//! Ticks, console events, and ctrl-c are multiplexed with `select!` on one
//! task, so every state change is serialized without locks.
//!
//! Startup restores the snapshot before the first tick; every exit path
//! attempts a save.

use std::time::Duration;

use borders_core::{
    CommandOutcome, Coordinator, ItemRegistry, SnapshotStore, StartupOutcome, TickSummary,
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::console::HostEvent;
use crate::world::SimulatedWorld;

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// A `quit` line was received.
    Quit,
    /// The process was interrupted (ctrl-c).
    Interrupted,
}

/// Result of a session run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResult {
    /// Why the loop stopped.
    pub end_reason: EndReason,
    /// How state was loaded at startup.
    pub startup: StartupOutcome,
    /// Ticks executed during this run.
    pub total_ticks: u64,
    /// Whether the final save succeeded.
    pub saved: bool,
}

/// The coordinator together with the world it governs.
pub struct Session {
    coordinator: Coordinator,
    world: SimulatedWorld,
    registry: Box<dyn ItemRegistry>,
}

impl Session {
    /// Assemble a session.
    pub fn new(coordinator: Coordinator, world: SimulatedWorld, registry: Box<dyn ItemRegistry>) -> Self {
        Self {
            coordinator,
            world,
            registry,
        }
    }

    /// The coordinator.
    pub const fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// The world.
    pub const fn world(&self) -> &SimulatedWorld {
        &self.world
    }

    /// Restore saved state and push the border to the world.
    pub fn startup<S>(&mut self, store: &S) -> StartupOutcome
    where
        S: SnapshotStore + ?Sized,
    {
        self.coordinator
            .on_startup(store, self.registry.as_ref(), &mut self.world)
    }

    /// Save state.
    pub fn shutdown<S>(&self, store: &S) -> bool
    where
        S: SnapshotStore + ?Sized,
    {
        self.coordinator.on_shutdown(store)
    }

    /// Run one game tick.
    pub fn tick(&mut self) -> TickSummary {
        self.coordinator.on_tick(&mut self.world)
    }

    /// Apply one console event. Returns `false` when the event asks to quit.
    pub fn handle(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::Join { name, position } => {
                let id = self.world.join(&name, position);
                let outcome = self
                    .coordinator
                    .on_player_join(&mut self.world, id, position);
                let at = self.world.player(id).map(|p| p.position);
                info!(player = %name, ?outcome, ?at, "Player joined");
            }
            HostEvent::Leave { name } => match self.world.leave(&name) {
                Some(id) => {
                    info!(player = %name, score = self.world.score(id), "Player left");
                }
                None => warn!(player = %name, "Leave for a player who is not online"),
            },
            HostEvent::Give { name, item, count } => {
                if self.registry.resolve(item.as_str()).is_none() {
                    warn!(player = %name, %item, "Unknown item, not given");
                } else if self.world.give(&name, &item, count).is_none() {
                    warn!(player = %name, "Give for a player who is not online");
                }
            }
            HostEvent::Die { name } => match self.world.online_id(&name) {
                Some(id) => {
                    let shrink = self.coordinator.on_player_death(&mut self.world, id);
                    info!(player = %name, shrunk = shrink.is_some(), "Player died");
                }
                None => warn!(player = %name, "Death for a player who is not online"),
            },
            HostEvent::Command(command) => {
                match self.coordinator.on_command(&mut self.world, command) {
                    Ok(CommandOutcome::Info(report)) => match serde_json::to_string(&report) {
                        Ok(json) => info!(target: "borders::chat", info = %json, "Borders info"),
                        Err(e) => warn!(error = %e, "Failed to render info"),
                    },
                    Ok(outcome) => info!(?outcome, "Command done"),
                    Err(e) => warn!(?command, error = %e, "Command rejected"),
                }
            }
            HostEvent::Quit => return false,
        }
        true
    }
}

/// Time between ticks for a given rate. A rate of zero is treated as one.
pub fn tick_period(ticks_per_second: u32) -> Duration {
    Duration::from_secs(1)
        .checked_div(ticks_per_second.max(1))
        .unwrap_or(Duration::from_secs(1))
}

/// Run the session until `quit` or ctrl-c, then save.
///
/// Console events are handled ahead of a due tick. When the console closes
/// the session keeps ticking until interrupted.
pub async fn run<S>(
    session: &mut Session,
    store: &S,
    mut events: mpsc::Receiver<HostEvent>,
    period: Duration,
) -> SessionResult
where
    S: SnapshotStore + ?Sized,
{
    let startup = session.startup(store);
    let period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
    info!(
        ?startup,
        period_ms,
        ticks_per_second = session.coordinator().ticks_per_second(),
        "Session starting"
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut total_ticks: u64 = 0;
    let mut input_open = true;

    let end_reason = loop {
        tokio::select! {
            biased;

            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for ctrl-c");
                }
                break EndReason::Interrupted;
            }

            event = events.recv(), if input_open => match event {
                Some(event) => {
                    if !session.handle(event) {
                        break EndReason::Quit;
                    }
                }
                None => {
                    info!("Console closed, running until interrupted");
                    input_open = false;
                }
            },

            _ = interval.tick() => {
                session.tick();
                total_ticks = total_ticks.saturating_add(1);
            }
        }
    };

    let saved = session.shutdown(store);
    info!(
        ?end_reason,
        total_ticks,
        tick = session.coordinator().state().global_tick,
        saved,
        "Session ended"
    );

    SessionResult {
        end_reason,
        startup,
        total_ticks,
        saved,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use borders_core::{BordersConfig, Command, KnownItems, OpenRegistry};
    use borders_persist::FileSnapshotStore;
    use borders_types::{Dimension, ItemId, Position};

    use super::*;

    fn session() -> Session {
        Session::new(
            Coordinator::new(&BordersConfig::default()),
            SimulatedWorld::new(&Dimension::ALL),
            Box::new(OpenRegistry),
        )
    }

    fn give(name: &str, raw: &str) -> HostEvent {
        HostEvent::Give {
            name: name.to_owned(),
            item: ItemId::parse(raw).unwrap(),
            count: 1,
        }
    }

    fn join(name: &str, x: f64, z: f64) -> HostEvent {
        HostEvent::Join {
            name: name.to_owned(),
            position: Position::new(x, 64.0, z),
        }
    }

    #[test]
    fn tick_period_follows_rate() {
        assert_eq!(tick_period(20), Duration::from_millis(50));
        assert_eq!(tick_period(0), Duration::from_secs(1));
    }

    #[test]
    fn session_drives_discovery_and_death() {
        let mut session = session();
        assert!(session.handle(join("alex", 100.0, 200.0)));
        assert!(session.handle(HostEvent::Command(Command::Start)));
        session.tick();

        session.handle(give("alex", "diamond"));
        let summary = session.tick();
        assert_eq!(summary.discoveries.len(), 1);
        assert_eq!(session.coordinator().state().border_size, 18.0);

        let alex = session.world().online_id("alex").unwrap();
        assert_eq!(session.world().score(alex), 1);
        assert_eq!(
            session.world().border(Dimension::End).map(|b| b.size),
            Some(18.0)
        );

        session.handle(HostEvent::Die {
            name: "alex".to_owned(),
        });
        assert_eq!(session.coordinator().state().border_size, 16.0);
        assert_eq!(session.world().border_label(), Some(16.0));
    }

    #[test]
    fn first_join_moves_player_to_cell_center() {
        let mut session = session();
        session.handle(join("alex", 100.0, 200.0));
        let alex = session.world().online_id("alex").unwrap();
        let position = session.world().player(alex).unwrap().position;
        assert_eq!(position, Position::new(104.0, 64.0, 200.0));
    }

    #[test]
    fn unknown_items_are_not_given() {
        let mut session = Session::new(
            Coordinator::new(&BordersConfig::default()),
            SimulatedWorld::new(&Dimension::ALL),
            Box::new(KnownItems::from_raw(["minecraft:stone"])),
        );
        session.handle(join("alex", 0.0, 0.0));
        session.handle(give("alex", "moon_rock"));
        let alex = session.world().online_id("alex").unwrap();
        assert!(session.world().player(alex).unwrap().slots.is_empty());
    }

    #[test]
    fn rejected_commands_keep_running() {
        let mut session = session();
        assert!(session.handle(HostEvent::Command(Command::Grow { per_side: 1 })));
        assert!(!session.coordinator().state().border_initialized);
        assert!(!session.handle(HostEvent::Quit));
    }

    #[tokio::test]
    async fn quit_ends_session_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("borders_state.json"));
        let (tx, rx) = mpsc::channel(8);
        tx.send(join("alex", 0.0, 0.0)).await.unwrap();
        tx.send(HostEvent::Command(Command::Grow { per_side: 2 }))
            .await
            .unwrap();
        tx.send(HostEvent::Quit).await.unwrap();

        let mut session = session();
        let result = run(&mut session, &store, rx, Duration::from_secs(3600)).await;

        assert_eq!(result.end_reason, EndReason::Quit);
        assert_eq!(result.startup, StartupOutcome::Fresh);
        assert!(result.saved);

        let mut restarted = self::session();
        let outcome = restarted.startup(&store);
        assert!(matches!(outcome, StartupOutcome::Restored(_)));
        assert_eq!(restarted.coordinator().state().border_size, 20.0);
    }
}
