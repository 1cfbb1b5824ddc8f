use anyhow::Result;

use super::help::help_text;
use super::Command;
use crate::display;
use crate::explorer::{Explorer, Snapshot};

impl Command {
    /// Execute a command against the explorer and return the output string.
    pub async fn execute(&self, explorer: &Explorer, json_output: bool) -> Result<String> {
        let snapshot = match self {
            Command::Connect => explorer.connect().await,
            Command::Refresh => explorer.refresh().await,
            Command::Show => explorer.snapshot(),
            Command::Next => explorer.next(),
            Command::Previous => explorer.previous(),
            Command::First => explorer.first(),
            Command::Last => explorer.last(),
            Command::Page { index } => explorer.go_to(*index),
            Command::Size { page_size } => explorer.set_page_size(*page_size),
            Command::Status => {
                let snapshot = explorer.snapshot();
                return if json_output {
                    Ok(display::format_snapshot_json(&snapshot)?)
                } else {
                    Ok(display::format_status(&snapshot, explorer.page_size_policy()))
                };
            }
            Command::Help { command } => return Ok(help_text(command.as_deref())),
            Command::Exit => return Ok(String::new()),
        };
        render(&snapshot, json_output)
    }
}

fn render(snapshot: &Snapshot, json_output: bool) -> Result<String> {
    if json_output {
        Ok(display::format_snapshot_json(snapshot)?)
    } else {
        Ok(display::format_snapshot(snapshot))
    }
}
