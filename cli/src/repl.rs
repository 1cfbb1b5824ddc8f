//! REPL shell: Reedline-based interactive explorer session.

use anyhow::Result;
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use wallet_explorer_core::{Command, ConnectionState, Explorer};

use crate::Cli;

const COMMANDS: &[&str] = &[
    "connect", "c", "refresh", "r", "show", "ls", "next", "n", "prev", "previous", "p", "first",
    "last", "page", "goto", "size", "page_size", "status", "help", "exit", "quit", "q",
];

pub async fn run_repl(cli: &Cli) -> Result<()> {
    println!("Wallet Explorer v{}", env!("CARGO_PKG_VERSION"));

    let explorer = cli.build_explorer()?;

    println!("Type 'connect' to load your wallet's transactions, 'help' for all commands.");
    println!();

    let completer = Box::new(DefaultCompleter::new(
        COMMANDS.iter().map(|c| c.to_string()).collect(),
    ));
    let mut line_editor = Reedline::create().with_completer(completer);

    loop {
        match line_editor.read_line(&prompt(&explorer)) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(cmd) => {
                        if cmd.is_async() {
                            println!("Working...");
                        }
                        match cmd.execute(&explorer, false).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => eprintln!("Error: {e}"),
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    Ok(())
}

/// `[explorer 0x1234…abcd]` once connected, plain `[explorer]` otherwise.
fn prompt(explorer: &Explorer) -> DefaultPrompt {
    let label = match explorer.snapshot().connection {
        ConnectionState::Connected(address) => format!("[explorer {}]", address.short()),
        _ => "[explorer]".to_string(),
    };
    DefaultPrompt::new(
        DefaultPromptSegment::Basic(label),
        DefaultPromptSegment::Empty,
    )
}
