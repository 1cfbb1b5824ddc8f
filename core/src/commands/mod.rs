/// Command definitions for the explorer REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Connect the wallet and load its history
    Connect,
    /// Re-fetch the history of the current account
    Refresh,
    /// Show the current page
    Show,
    /// Next page
    Next,
    /// Previous page
    Previous,
    /// First page
    First,
    /// Last page
    Last,
    /// Jump to a page: page <n> (1-based; stored zero-based, may be out of range)
    Page { index: i64 },
    /// Change rows per page: size <n>
    Size { page_size: usize },
    /// Show connection and fetch status
    Status,
    /// Print help
    Help { command: Option<String> },
    /// Exit the explorer
    Exit,
}

impl Command {
    /// Whether the command waits on the network.
    pub fn is_async(&self) -> bool {
        matches!(self, Command::Connect | Command::Refresh)
    }
}
