//! Operator command parsing

use satlink_playback::PlaybackCommand;
use thiserror::Error;

/// One line of operator input
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Start the run once every panel is complete
    Start,
    Playback(PlaybackCommand),
    Ready(String),
    Set {
        panel: String,
        parameter: String,
        value: String,
    },
    Export,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try /help)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("not a number: {0}")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
/start                         start the run (all panels ready)
/pause                         pause the clock
/stop                          stop the clock
/scrub <secs>                  drag the scrubber to a time
/release                       release the scrubber
/mark <label>                  record an event marker
/ready <panel>                 mark a panel complete
/set <panel> <param> <value>   record a parameter
/export                        write the parameter table to CSV
/status                        show panels and parameters
/quit                          exit";

impl ConsoleCommand {
    /// Parse a line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "/start" => ConsoleCommand::Start,
            "/pause" => ConsoleCommand::Playback(PlaybackCommand::Pause),
            "/stop" => ConsoleCommand::Playback(PlaybackCommand::Stop),
            "/scrub" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("/scrub <secs>"));
                }
                let secs: f64 = rest
                    .parse()
                    .map_err(|_| CommandError::InvalidNumber(rest.to_string()))?;
                if !secs.is_finite() {
                    return Err(CommandError::InvalidNumber(rest.to_string()));
                }
                ConsoleCommand::Playback(PlaybackCommand::Scrub(secs))
            }
            "/release" => ConsoleCommand::Playback(PlaybackCommand::EndScrub),
            "/mark" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("/mark <label>"));
                }
                ConsoleCommand::Playback(PlaybackCommand::Mark(rest.to_string()))
            }
            "/ready" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("/ready <panel>"));
                }
                ConsoleCommand::Ready(rest.to_string())
            }
            "/set" => {
                let mut parts = rest.splitn(3, char::is_whitespace);
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(panel), Some(parameter), Some(value))
                        if !panel.is_empty() && !parameter.is_empty() =>
                    {
                        ConsoleCommand::Set {
                            panel: panel.to_string(),
                            parameter: parameter.to_string(),
                            value: value.trim().to_string(),
                        }
                    }
                    _ => return Err(CommandError::Usage("/set <panel> <param> <value>")),
                }
            }
            "/export" => ConsoleCommand::Export,
            "/status" => ConsoleCommand::Status,
            "/help" => ConsoleCommand::Help,
            "/quit" | "/exit" => ConsoleCommand::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}
