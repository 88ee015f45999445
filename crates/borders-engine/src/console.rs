//! Console input: line parsing and the stdin reader task.
//!
//! Each line is one event:
//!
//! ```text
//! join <name> <x> <y> <z>
//! leave <name>
//! give <name> <item> [count]
//! die <name>
//! borders <start|stop|reset|info>
//! borders <settimer|setgrowth|grow|shrink|backlog> <n>
//! borders failsafe <on|off>
//! borders deathshrink <on|off> [n]
//! quit
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::fmt::Display;
use std::str::FromStr;

use borders_core::Command;
use borders_types::{ItemId, Position};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::ConsoleError;

/// Something that happened in the headless world.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A player connected at a position.
    Join {
        /// Player name.
        name: String,
        /// Where they appear.
        position: Position,
    },
    /// A player disconnected.
    Leave {
        /// Player name.
        name: String,
    },
    /// Items were added to a player's inventory.
    Give {
        /// Player name.
        name: String,
        /// The item.
        item: ItemId,
        /// How many.
        count: u32,
    },
    /// A player died.
    Die {
        /// Player name.
        name: String,
    },
    /// An operator command.
    Command(Command),
    /// Shut down.
    Quit,
}

/// Parse one console line. Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`ConsoleError`] describing why the line was rejected.
pub fn parse_line(line: &str) -> Result<Option<HostEvent>, ConsoleError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut args = Args::new(line);
    let verb = args.verb.clone();
    let event = match verb.as_str() {
        "join" => {
            let name = args.word("<name> <x> <y> <z>")?;
            let x = args.coordinate("<name> <x> <y> <z>")?;
            let y = args.coordinate("<name> <x> <y> <z>")?;
            let z = args.coordinate("<name> <x> <y> <z>")?;
            HostEvent::Join {
                name,
                position: Position::new(x, y, z),
            }
        }
        "leave" => HostEvent::Leave {
            name: args.word("<name>")?,
        },
        "give" => {
            let name = args.word("<name> <item> [count]")?;
            let item = ItemId::parse(&args.word("<name> <item> [count]")?)?;
            let count = args.optional_number("count")?.unwrap_or(1);
            HostEvent::Give { name, item, count }
        }
        "die" => HostEvent::Die {
            name: args.word("<name>")?,
        },
        "borders" => HostEvent::Command(parse_borders(&mut args)?),
        "quit" | "exit" => HostEvent::Quit,
        _ => return Err(ConsoleError::UnknownVerb { verb }),
    };

    args.finish()?;
    Ok(Some(event))
}

fn parse_borders(args: &mut Args<'_>) -> Result<Command, ConsoleError> {
    let sub = args.word("a subcommand")?;
    let command = match sub.as_str() {
        "start" => Command::Start,
        "stop" => Command::Stop,
        "reset" => Command::Reset,
        "info" => Command::Info,
        "settimer" => Command::SetTimer {
            seconds: args.number("settimer <seconds>", "seconds")?,
        },
        "setgrowth" => Command::SetGrowth {
            per_side: args.number("setgrowth <blocks>", "blocks")?,
        },
        "grow" => Command::Grow {
            per_side: args.number("grow <blocks>", "blocks")?,
        },
        "shrink" => Command::Shrink {
            per_side: args.number("shrink <blocks>", "blocks")?,
        },
        "backlog" => Command::SetBacklog {
            count: args.number("backlog <count>", "count")?,
        },
        "failsafe" => Command::SetFailsafe {
            enabled: args.toggle("failsafe <on|off>")?,
        },
        "deathshrink" => Command::SetDeathShrink {
            enabled: args.toggle("deathshrink <on|off> [blocks]")?,
            per_side: args.optional_number("blocks")?,
        },
        _ => {
            return Err(ConsoleError::UnknownVerb {
                verb: format!("borders {sub}"),
            });
        }
    };
    Ok(command)
}

/// Whitespace-separated arguments following a verb.
struct Args<'a> {
    verb: String,
    rest: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(line: &'a str) -> Self {
        let mut rest = line.split_whitespace();
        let verb = rest.next().unwrap_or_default().to_ascii_lowercase();
        Self { verb, rest }
    }

    fn word(&mut self, expected: &'static str) -> Result<String, ConsoleError> {
        self.rest
            .next()
            .map(str::to_owned)
            .ok_or_else(|| ConsoleError::MissingArgument {
                verb: self.verb.clone(),
                expected,
            })
    }

    fn number<T>(&mut self, expected: &'static str, what: &'static str) -> Result<T, ConsoleError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.word(expected)?;
        parse_number(&raw, what)
    }

    fn coordinate(&mut self, expected: &'static str) -> Result<f64, ConsoleError> {
        let raw = self.word(expected)?;
        let value: f64 = parse_number(&raw, "coordinate")?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ConsoleError::InvalidArgument {
                what: "coordinate",
                raw,
                reason: "must be a finite number".to_owned(),
            })
        }
    }

    fn optional_number<T>(&mut self, what: &'static str) -> Result<Option<T>, ConsoleError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.rest.next().map(|raw| parse_number(raw, what)).transpose()
    }

    fn toggle(&mut self, expected: &'static str) -> Result<bool, ConsoleError> {
        let raw = self.word(expected)?;
        match raw.to_ascii_lowercase().as_str() {
            "on" | "true" | "enable" => Ok(true),
            "off" | "false" | "disable" => Ok(false),
            _ => Err(ConsoleError::InvalidArgument {
                what: "toggle",
                raw,
                reason: "expected on or off".to_owned(),
            }),
        }
    }

    fn finish(mut self) -> Result<(), ConsoleError> {
        match self.rest.next() {
            Some(extra) => Err(ConsoleError::TrailingArgument {
                verb: self.verb,
                extra: extra.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

fn parse_number<T>(raw: &str, what: &'static str) -> Result<T, ConsoleError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| ConsoleError::InvalidArgument {
        what,
        raw: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// Read lines from `input` and forward parsed events until input ends or
/// the receiver is dropped. Malformed lines are logged and skipped.
pub async fn forward_lines<R>(input: R, events: mpsc::Sender<HostEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Console input closed");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Console read failed, no further input");
                return;
            }
        };

        match parse_line(&line) {
            Ok(Some(event)) => {
                if events.send(event).await.is_err() {
                    return;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(line = %line, error = %e, "Ignoring console line"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_world_events() {
        assert_eq!(
            parse_line("join alex 100 64 -20.5").unwrap(),
            Some(HostEvent::Join {
                name: "alex".to_owned(),
                position: Position::new(100.0, 64.0, -20.5),
            })
        );
        assert_eq!(
            parse_line("give alex oak_log").unwrap(),
            Some(HostEvent::Give {
                name: "alex".to_owned(),
                item: ItemId::parse("minecraft:oak_log").unwrap(),
                count: 1,
            })
        );
        assert_eq!(
            parse_line("  die   sam ").unwrap(),
            Some(HostEvent::Die {
                name: "sam".to_owned()
            })
        );
        assert_eq!(parse_line("quit").unwrap(), Some(HostEvent::Quit));
    }

    #[test]
    fn parses_borders_subcommands() {
        let cases = [
            ("borders start", Command::Start),
            ("borders settimer 120", Command::SetTimer { seconds: 120 }),
            ("borders grow 5", Command::Grow { per_side: 5 }),
            ("borders shrink 2", Command::Shrink { per_side: 2 }),
            ("borders failsafe off", Command::SetFailsafe { enabled: false }),
            (
                "borders deathshrink on 3",
                Command::SetDeathShrink {
                    enabled: true,
                    per_side: Some(3),
                },
            ),
            (
                "borders deathshrink off",
                Command::SetDeathShrink {
                    enabled: false,
                    per_side: None,
                },
            ),
            ("borders backlog 50", Command::SetBacklog { count: 50 }),
        ];
        for (line, expected) in cases {
            assert_eq!(
                parse_line(line).unwrap(),
                Some(HostEvent::Command(expected)),
                "{line}"
            );
        }
    }

    #[test]
    fn negative_growth_parses_and_is_left_to_the_coordinator() {
        assert_eq!(
            parse_line("borders setgrowth -1").unwrap(),
            Some(HostEvent::Command(Command::SetGrowth { per_side: -1 }))
        );
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   # setup").unwrap(), None);
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert!(matches!(
            parse_line("dance alex"),
            Err(ConsoleError::UnknownVerb { .. })
        ));
        assert!(matches!(
            parse_line("join alex 1 2"),
            Err(ConsoleError::MissingArgument { .. })
        ));
        for line in ["join alex nan 64 0", "join alex 0 inf 0", "join alex 0 64 -infinity"] {
            assert!(
                matches!(
                    parse_line(line),
                    Err(ConsoleError::InvalidArgument {
                        what: "coordinate",
                        ..
                    })
                ),
                "{line}"
            );
        }
        assert!(matches!(
            parse_line("borders settimer soon"),
            Err(ConsoleError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse_line("give alex Bad:Item"),
            Err(ConsoleError::InvalidItem { .. })
        ));
        assert!(matches!(
            parse_line("leave alex now"),
            Err(ConsoleError::TrailingArgument { .. })
        ));
        assert!(matches!(
            parse_line("borders teleport"),
            Err(ConsoleError::UnknownVerb { .. })
        ));
    }

    #[tokio::test]
    async fn forwards_valid_lines_and_skips_bad_ones() {
        let input: &[u8] = b"join alex 0 64 0\nnonsense\n\nborders start\n";
        let (tx, mut rx) = mpsc::channel(8);

        forward_lines(input, tx).await;

        assert!(matches!(rx.recv().await, Some(HostEvent::Join { .. })));
        assert_eq!(rx.recv().await, Some(HostEvent::Command(Command::Start)));
        assert_eq!(rx.recv().await, None);
    }
}
