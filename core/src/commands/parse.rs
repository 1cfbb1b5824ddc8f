use anyhow::{bail, Result};

use super::Command;
use crate::pagination::PAGE_SIZE_OPTIONS;

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or_default().to_lowercase();
        let arg1 = parts.next();
        if parts.next().is_some() {
            bail!("Too many arguments. Type 'help {cmd}' for usage.");
        }

        match cmd.as_str() {
            "connect" | "c" => Ok(Command::Connect),

            "refresh" | "r" => Ok(Command::Refresh),

            "show" | "ls" => Ok(Command::Show),

            "next" | "n" => Ok(Command::Next),

            "prev" | "previous" | "p" => Ok(Command::Previous),

            "first" => Ok(Command::First),

            "last" => Ok(Command::Last),

            "page" | "goto" => {
                let raw = arg1.ok_or_else(|| {
                    anyhow::anyhow!("Missing page number. Usage: page <n>")
                })?;
                let number: i64 = raw
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid page number '{raw}'. Usage: page <n>"))?;
                Ok(Command::Page {
                    index: number.saturating_sub(1),
                })
            }

            "size" | "page_size" => {
                let raw = arg1.ok_or_else(|| {
                    anyhow::anyhow!(
                        "Missing page size. Usage: size <n>  (common sizes: {})",
                        size_options()
                    )
                })?;
                let page_size: usize = raw
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid page size '{raw}'. Usage: size <n>"))?;
                if page_size == 0 {
                    bail!("Page size must be at least 1.");
                }
                Ok(Command::Size { page_size })
            }

            "status" => Ok(Command::Status),

            "help" | "h" | "?" => Ok(Command::Help {
                command: arg1.map(|s| s.to_lowercase()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}

fn size_options() -> String {
    PAGE_SIZE_OPTIONS
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
