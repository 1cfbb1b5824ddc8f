mod repl;

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wallet_explorer_core::network::{DEFAULT_API_URL, DEFAULT_CHAIN_ID};
use wallet_explorer_core::{
    Address, Command, Explorer, ExplorerConfig, HistoryClient, HistoryConfig,
    JsonRpcWalletProvider, PageSizePolicy, StaticWalletProvider, WalletProvider,
};

const DEFAULT_LOG_FILTER: &str = "wallet_explorer=info,wallet_explorer_core=info";

#[derive(Parser)]
#[command(
    name = "wallet-explorer",
    about = "Wallet Explorer: browse an account's transaction history",
    version
)]
pub(crate) struct Cli {
    /// Watch a fixed address instead of asking a wallet
    #[arg(long, conflicts_with = "wallet_rpc")]
    address: Option<Address>,

    /// JSON-RPC endpoint of a wallet that answers eth_requestAccounts
    #[arg(long, env = "EXPLORER_WALLET_RPC")]
    wallet_rpc: Option<String>,

    /// Etherscan-compatible history API
    #[arg(long, env = "EXPLORER_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// History API key
    #[arg(long, env = "EXPLORER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chain ID sent to multichain APIs (default: Sepolia)
    #[arg(long, env = "EXPLORER_CHAIN_ID", default_value_t = DEFAULT_CHAIN_ID)]
    chain_id: u64,

    /// Rows per page
    #[arg(long, default_value = "8")]
    page_size: NonZeroUsize,

    /// What happens to the current page when the page size changes: preserve or reset
    #[arg(long, default_value = "preserve")]
    size_policy: PageSizePolicy,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 20)]
    timeout: u64,

    /// Allow non-HTTPS endpoints
    #[arg(long)]
    insecure: bool,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            chain_id: Some(self.chain_id),
            timeout: self.timeout(),
            allow_insecure: self.insecure,
        }
    }

    fn explorer_config(&self) -> ExplorerConfig {
        ExplorerConfig {
            page_size: self.page_size.get(),
            page_size_policy: self.size_policy,
        }
    }

    /// `--address` watches a fixed account, `--wallet-rpc` asks a wallet.
    /// With neither, connecting reports that no wallet is available.
    fn wallet_provider(&self) -> Result<Option<Arc<dyn WalletProvider>>> {
        if let Some(address) = &self.address {
            return Ok(Some(Arc::new(StaticWalletProvider::single(address.clone()))));
        }
        match &self.wallet_rpc {
            Some(url) => {
                let provider = JsonRpcWalletProvider::new(url, self.timeout(), self.insecure)?;
                debug!(endpoint = provider.endpoint(), "using JSON-RPC wallet");
                Ok(Some(Arc::new(provider)))
            }
            None => Ok(None),
        }
    }

    fn has_wallet(&self) -> bool {
        self.address.is_some() || self.wallet_rpc.is_some()
    }

    pub(crate) fn build_explorer(&self) -> Result<Explorer> {
        let client = HistoryClient::new(&self.history_config())?;
        debug!(endpoint = client.endpoint(), "history API");
        Ok(Explorer::new(
            self.wallet_provider()?,
            Arc::new(client),
            self.explorer_config(),
        ))
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging();

    if let Some(cmd_str) = &cli.cmd {
        run_oneshot(&cli, cmd_str).await
    } else {
        repl::run_repl(&cli).await
    }
}

async fn run_oneshot(cli: &Cli, cmd_str: &str) -> Result<()> {
    let command = Command::parse(cmd_str)?;
    if command == Command::Exit {
        return Ok(());
    }

    let explorer = cli.build_explorer()?;

    // Everything but help and connect itself reads the history, so load it first.
    let needs_history = !matches!(command, Command::Connect | Command::Help { .. });
    if needs_history && cli.has_wallet() {
        explorer.connect().await;
    }

    let output = command.execute(&explorer, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn address_and_wallet_rpc_conflict() {
        let result = Cli::try_parse_from([
            "wallet-explorer",
            "--address",
            "0xabc",
            "--wallet-rpc",
            "http://127.0.0.1:1248",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["wallet-explorer", "--address", "0xabc"]).unwrap();
        let config = cli.explorer_config();
        assert_eq!(config.page_size, 8);
        assert_eq!(config.page_size_policy, PageSizePolicy::PreserveIndex);
        assert_eq!(cli.history_config().chain_id, Some(DEFAULT_CHAIN_ID));
        assert!(cli.has_wallet());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Cli::try_parse_from(["wallet-explorer", "--page-size", "0"]).is_err());
    }

    #[test]
    fn reset_policy_parses() {
        let cli = Cli::try_parse_from(["wallet-explorer", "--size-policy", "reset"]).unwrap();
        assert_eq!(cli.size_policy, PageSizePolicy::ResetToFirst);
    }
}
