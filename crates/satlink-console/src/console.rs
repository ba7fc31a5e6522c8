//! Operator input handling
//!
//! Owns the panel and parameter state; playback commands are forwarded to
//! the tick task over the command channel.

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use satlink_core::SatlinkResult;
use satlink_playback::{CommandSender, PlaybackCommand};

use crate::commands::{ConsoleCommand, HELP};
use crate::export::{write_csv, ParameterRow, ParameterTable};
use crate::panels::PanelReadiness;

/// Whether the input loop keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    panels: PanelReadiness,
    parameters: ParameterTable,
    save_path: PathBuf,
    commands: CommandSender,
}

impl Console {
    pub fn new(panels: PanelReadiness, save_path: PathBuf, commands: CommandSender) -> Self {
        Console {
            panels,
            parameters: ParameterTable::new(),
            save_path,
            commands,
        }
    }

    /// Handle one command, returning the operator-facing reply
    pub async fn handle(&mut self, command: ConsoleCommand) -> (Flow, String) {
        match command {
            ConsoleCommand::Start => match self.panels.ensure_ready() {
                Ok(()) => self.forward(PlaybackCommand::Start, "started").await,
                Err(e) => (Flow::Continue, e.to_string()),
            },
            ConsoleCommand::Playback(command) => self.forward(command, "ok").await,
            ConsoleCommand::Ready(panel) => {
                let reply = if self.panels.mark_complete(&panel) {
                    match self.panels.missing() {
                        missing if missing.is_empty() => "all panels ready".to_string(),
                        missing => format!("waiting on: {}", missing.join(", ")),
                    }
                } else {
                    format!(
                        "unknown panel {} (panels: {})",
                        panel,
                        self.panels.required().join(", ")
                    )
                };
                (Flow::Continue, reply)
            }
            ConsoleCommand::Set {
                panel,
                parameter,
                value,
            } => {
                self.parameters.set(ParameterRow::new(panel, parameter, value));
                (Flow::Continue, format!("{} parameters", self.parameters.len()))
            }
            ConsoleCommand::Export => match self.export().await {
                Ok(()) => (
                    Flow::Continue,
                    format!("exported to {}", self.save_path.display()),
                ),
                Err(e) => {
                    tracing::error!(error = %e, "export failed");
                    (Flow::Continue, format!("export failed: {}", e))
                }
            },
            ConsoleCommand::Status => (Flow::Continue, self.status()),
            ConsoleCommand::Help => (Flow::Continue, HELP.to_string()),
            ConsoleCommand::Quit => (Flow::Quit, "bye".to_string()),
        }
    }

    async fn forward(&self, command: PlaybackCommand, reply: &str) -> (Flow, String) {
        match self.commands.send(command).await {
            Ok(()) => (Flow::Continue, reply.to_string()),
            Err(_) => (Flow::Quit, "playback loop has exited".to_string()),
        }
    }

    async fn export(&self) -> SatlinkResult<()> {
        tracing::debug!(table = %self.parameters.to_json()?, "exporting parameters");
        write_csv(&self.save_path, self.parameters.rows()).await
    }

    fn status(&self) -> String {
        let missing = self.panels.missing();
        let panels = if missing.is_empty() {
            "all panels ready".to_string()
        } else {
            format!("waiting on: {}", missing.join(", "))
        };
        if self.parameters.is_empty() {
            return format!("{}; no parameters", panels);
        }
        let mut out = format!("{}; {} parameters", panels, self.parameters.len());
        for row in self.parameters.rows() {
            out.push_str(&format!("\n  {}.{} = {}", row.panel, row.parameter, row.value_text()));
        }
        out
    }
}

/// Read commands from `input` until `/quit` or end of input. Dropping the
/// console afterwards closes the command channel.
pub async fn run_input<R>(mut console: Console, input: R) -> SatlinkResult<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match ConsoleCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        let (flow, reply) = console.handle(command).await;
        println!("{}", reply);
        if flow == Flow::Quit {
            break;
        }
    }
    tracing::info!("input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use satlink_playback::CommandReceiver;
    use tokio::sync::mpsc;

    fn console(panels: &[&str], save_path: PathBuf) -> (Console, CommandReceiver) {
        let (tx, rx) = mpsc::channel(16);
        (
            Console::new(PanelReadiness::new(panels.iter().copied()), save_path, tx),
            rx,
        )
    }

    #[tokio::test]
    async fn test_start_waits_for_panels() {
        let (mut console, mut rx) = console(&["orbit", "channel"], PathBuf::from("unused.csv"));

        let (flow, reply) = console.handle(ConsoleCommand::Start).await;
        assert_eq!(flow, Flow::Continue);
        assert!(reply.contains("orbit, channel"));
        assert!(rx.try_recv().is_err());

        console.handle(ConsoleCommand::Ready("orbit".into())).await;
        console.handle(ConsoleCommand::Ready("channel".into())).await;
        console.handle(ConsoleCommand::Start).await;
        assert_eq!(rx.try_recv().unwrap(), PlaybackCommand::Start);
    }

    #[tokio::test]
    async fn test_playback_commands_forwarded() {
        let (mut console, mut rx) = console(&[], PathBuf::from("unused.csv"));
        console
            .handle(ConsoleCommand::Playback(PlaybackCommand::Scrub(4.0)))
            .await;
        console
            .handle(ConsoleCommand::Playback(PlaybackCommand::Mark("x".into())))
            .await;
        assert_eq!(rx.try_recv().unwrap(), PlaybackCommand::Scrub(4.0));
        assert_eq!(rx.try_recv().unwrap(), PlaybackCommand::Mark("x".into()));
    }

    #[tokio::test]
    async fn test_forward_after_loop_exit_quits() {
        let (mut console, rx) = console(&[], PathBuf::from("unused.csv"));
        drop(rx);
        let (flow, _) = console
            .handle(ConsoleCommand::Playback(PlaybackCommand::Pause))
            .await;
        assert_eq!(flow, Flow::Quit);
    }

    #[tokio::test]
    async fn test_export_writes_table() {
        let dir = std::env::temp_dir().join(format!("satlink-console-{}", std::process::id()));
        let path = dir.join("InputDatas.csv");
        let (mut console, _rx) = console(&[], path.clone());

        console
            .handle(ConsoleCommand::Set {
                panel: "orbit".into(),
                parameter: "altitude_km".into(),
                value: "550".into(),
            })
            .await;
        let (_, reply) = console.handle(ConsoleCommand::Export).await;
        assert!(reply.starts_with("exported"));

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.ends_with("orbit,altitude_km,550\r\n"));
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_input_stops_at_quit() {
        let (console, mut rx) = console(&[], PathBuf::from("unused.csv"));
        let input: &[u8] = b"/stop\n\n/bogus\n/quit\n/pause\n";
        run_input(console, input).await.unwrap();

        assert_eq!(rx.recv().await, Some(PlaybackCommand::Stop));
        // the console was dropped, so the channel is closed
        assert_eq!(rx.recv().await, None);
    }
}
