// CLI for smoke tests against a live backend

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{comments, config, receipt, watch, GlobalOpts};

#[derive(Parser)]
#[command(name = "solsocial")]
#[command(about = "SolSocial client core - smoke tests and state inspection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (missing file means defaults)
    #[arg(short, long, global = true, default_value = "solsocial.toml")]
    config: PathBuf,

    /// Override a config value (`polling.interval_ms=5000`), repeatable
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Wallet address to act as
    #[arg(short, long, global = true)]
    wallet: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a feed and print new posts as polling finds them
    Watch {
        /// Feed to watch (following, explore, trending, receipts)
        #[arg(short, long, default_value = "following")]
        feed: String,

        /// Stop after this many polls (0 runs until Ctrl-C)
        #[arg(short, long, default_value = "0")]
        ticks: u32,

        /// Merge pending posts into the feed after each poll
        #[arg(short, long)]
        merge: bool,
    },

    /// Receipt operations
    Receipt {
        #[command(subcommand)]
        command: receipt::ReceiptSubcommand,
    },

    /// List comments on a post, optionally posting one first
    Comments {
        /// Post signature or numeric post id
        content: String,

        /// Comment text to post before listing
        #[arg(short, long)]
        post: Option<String>,
    },

    /// Configuration inspection
    Config {
        #[command(subcommand)]
        command: config::ConfigSubcommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let opts = GlobalOpts {
        config_path: cli.config,
        overrides: cli.overrides,
        wallet: cli.wallet,
    };

    match cli.command {
        Commands::Watch { feed, ticks, merge } => {
            watch::run(&opts, &feed, ticks, merge).await?;
        }
        Commands::Receipt { command } => {
            receipt::handle_receipt_command(&opts, &command).await?;
        }
        Commands::Comments { content, post } => {
            comments::run(&opts, &content, post.as_deref()).await?;
        }
        Commands::Config { command } => {
            config::handle_config_command(&opts, &command)?;
        }
    }

    Ok(())
}
