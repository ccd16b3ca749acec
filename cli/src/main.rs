//! granary — command-line front end for the staking read path.
//!
//! Signing stays behind the wallet seam, so every command here is read-only:
//! address derivation, inventories, and vault accounting.

use anyhow::Context;
use clap::{Parser, Subcommand};
use granary_client::{list_tokens, IndexerClient, RestClient};
use granary_crypto::resource_account_address_hex;
use granary_staking::{FarmConfig, VaultAccounting};
use granary_types::AccountAddress;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "granary", about = "NFT staking farm client")]
struct Cli {
    /// Path to a TOML farm configuration file.
    #[arg(long, env = "GRANARY_CONFIG")]
    config: Option<String>,

    /// Override the configured ledger node URL.
    #[arg(long, env = "GRANARY_NODE_URL")]
    node_url: Option<String>,

    /// Override the configured indexer URL.
    #[arg(long, env = "GRANARY_INDEXER_URL")]
    indexer_url: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "GRANARY_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive a named resource account address (offline, no network).
    Derive {
        /// Owner address in hex.
        #[arg(long)]
        owner: String,
        /// Seed string, e.g. "farm" or "bank".
        #[arg(long)]
        seed: String,
    },
    /// Print the configured farm's resource account address.
    FarmAddress,
    /// List the tokens currently held by an address.
    Inventory {
        /// Address to query, in hex.
        address: String,
        /// Filter by creator address.
        #[arg(long)]
        creator: Option<String>,
        /// Filter by collection name.
        #[arg(long)]
        collection: Option<String>,
    },
    /// Print the reward vault snapshot.
    Snapshot,
    /// Sum staked tokens across all registered participants.
    TotalStaked,
}

fn load_config(cli: &Cli) -> anyhow::Result<FarmConfig> {
    let path = cli
        .config
        .as_deref()
        .context("--config <file> is required for this command")?;
    let mut config =
        FarmConfig::from_toml_file(path).with_context(|| format!("failed to load {path}"))?;
    if let Some(url) = &cli.node_url {
        config.node_url = url.clone();
    }
    if let Some(url) = &cli.indexer_url {
        config.indexer_url = url.clone();
    }
    Ok(config)
}

fn indexer_for(cli: &Cli) -> anyhow::Result<IndexerClient> {
    let url = match &cli.indexer_url {
        Some(url) => url.clone(),
        None => load_config(cli)?.indexer_url,
    };
    Ok(IndexerClient::new(url)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match &cli.command {
        Command::Derive { owner, seed } => {
            let derived = resource_account_address_hex(owner, seed.as_bytes())?;
            println!("{derived}");
        }

        Command::FarmAddress => {
            let config = load_config(&cli)?;
            println!("{}", config.farm_address());
        }

        Command::Inventory {
            address,
            creator,
            collection,
        } => {
            let owner = AccountAddress::from_hex(address)?;
            let creator = creator
                .as_deref()
                .map(AccountAddress::from_hex)
                .transpose()?;
            let indexer = indexer_for(&cli)?;

            let tokens =
                list_tokens(&indexer, &owner, creator.as_ref(), collection.as_deref()).await?;
            if tokens.is_empty() {
                println!("no tokens held");
            }
            for token in tokens {
                println!(
                    "{}\t{}\tsupply {}/{}\t{}",
                    token.collection, token.name, token.supply, token.maximum, token.uri
                );
            }
        }

        Command::Snapshot => {
            let config = load_config(&cli)?;
            let ledger = RestClient::new(config.node_url.clone())?;
            let indexer = IndexerClient::new(config.indexer_url.clone())?;
            let vault = VaultAccounting::new(config, ledger, indexer);

            let snapshot = vault.fetch_snapshot().await?;
            println!("available rewards: {}", snapshot.available_rewards);
            println!("reward rate:       {}/s", snapshot.reward_rate);
            println!("receivers:         {}", snapshot.num_receivers);
            println!("debt queue:        {}", snapshot.debt_queue_len);
        }

        Command::TotalStaked => {
            let config = load_config(&cli)?;
            let ledger = RestClient::new(config.node_url.clone())?;
            let indexer = IndexerClient::new(config.indexer_url.clone())?;
            let vault = VaultAccounting::new(config, ledger, indexer);

            let total = vault.fetch_total_staked().await?;
            println!("total staked: {}", total.total);
            for participant in &total.failed_participants {
                println!("warning: could not query bank of {participant}");
            }
        }
    }

    Ok(())
}
