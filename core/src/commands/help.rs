#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("connect") | Some("c") => {
            "connect\n  Ask the wallet for its account and load the transaction history.\n  Connecting again always reloads, even for the same account.\n  Alias: c".to_string()
        }
        Some("refresh") | Some("r") => {
            "refresh\n  Reload the transaction history of the current account.\n  Alias: r".to_string()
        }
        Some("show") | Some("ls") => {
            "show\n  Show the current page of transactions.\n  Alias: ls".to_string()
        }
        Some("next") | Some("n") => "next\n  Go to the next page.\n  Alias: n".to_string(),
        Some("prev") | Some("previous") | Some("p") => {
            "prev\n  Go to the previous page.\n  Aliases: previous, p".to_string()
        }
        Some("first") => "first\n  Go to the first page.".to_string(),
        Some("last") => "last\n  Go to the last page.".to_string(),
        Some("page") | Some("goto") => {
            "page <n>\n  Jump to page n (1-based). Numbers past either end land on the\n  first or last page.\n  Alias: goto".to_string()
        }
        Some("size") | Some("page_size") => {
            "size <n>\n  Show n transactions per page (common: 8, 10, 20, 50).\n  The current page is kept when it still exists.\n  Alias: page_size".to_string()
        }
        Some("status") => {
            "status\n  Show the wallet connection and history loading state.".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Exit the explorer.\n  Aliases: quit, q".to_string()
        }
        Some("help") | Some("h") | Some("?") => {
            "help [command]\n  Show all commands, or details for one.".to_string()
        }
        Some(other) => format!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        None => [
            "Commands:",
            "  connect        Connect the wallet and load its history",
            "  refresh        Reload the history",
            "  show           Show the current page",
            "  next / prev    Move one page forward or back",
            "  first / last   Jump to the first or last page",
            "  page <n>       Jump to page n",
            "  size <n>       Set rows per page",
            "  status         Show connection and loading state",
            "  help [cmd]     Show help",
            "  exit           Exit",
        ]
        .join("\n"),
    }
}
