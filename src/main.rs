mod commands;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gratchain::chain::amount::DEFAULT_TIP;
use gratchain::context::{AppContext, SenderKind, Settings};
use gratchain::models::Category;

use crate::commands::batch::BatchOptions;

#[derive(Parser, Debug)]
#[command(name = "gratchain")]
#[command(about = "GratChain tipping CLI", long_about = None)]
struct Cli {
    #[arg(long, default_value = "gratchain.db")]
    db_path: String,

    /// JSON file with creators; the built-in list is used otherwise.
    #[arg(long, env = "GRATCHAIN_CREATORS")]
    creators_file: Option<PathBuf>,

    /// Connected wallet account. Without it nothing can be tipped.
    #[arg(long, env = "GRATCHAIN_WALLET")]
    wallet: Option<String>,

    /// 84532 = Base Sepolia, 8453 = Base.
    #[arg(long, env = "GRATCHAIN_CHAIN_ID", default_value_t = 84532)]
    chain_id: u64,

    #[arg(long, env = "GRATCHAIN_TIP_DELAY_MS", default_value_t = 2000)]
    tip_delay_ms: u64,

    #[arg(long, value_enum, default_value = "simulated")]
    sender: SenderKind,

    /// Simulated tips to these addresses fail (repeatable).
    #[arg(long = "fail-recipient")]
    fail_recipients: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    List {
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long)]
        json: bool,
    },
    Show {
        /// Creator id or wallet address.
        creator: String,
    },
    Tip {
        #[arg(long)]
        creator: String,
        #[arg(long, default_value = DEFAULT_TIP)]
        amount: String,
    },
    Batch {
        /// Only creators in this category take part.
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long)]
        all: bool,
        /// Toggle a creator's selection (repeatable).
        #[arg(long)]
        select: Vec<String>,
        /// `<ID>=<ETH>` (repeatable).
        #[arg(long = "amount")]
        amounts: Vec<String>,
        #[arg(long)]
        step_up: Vec<String>,
        #[arg(long)]
        step_down: Vec<String>,
        #[arg(long)]
        dry_run: bool,
    },
    History {
        #[arg(long)]
        creator: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let settings = Settings {
        db_path: cli.db_path,
        creators_file: cli.creators_file,
        wallet: cli.wallet,
        chain_id: cli.chain_id,
        tip_delay: Duration::from_millis(cli.tip_delay_ms),
        sender: cli.sender,
        fail_recipients: cli.fail_recipients,
    };
    let ctx = AppContext::build(&settings)?;

    match cli.command {
        Commands::List { category, json } => commands::list::run(&ctx, category, json),
        Commands::Show { creator } => commands::show::run(&ctx, &creator),
        Commands::Tip { creator, amount } => commands::tip::run(&ctx, &creator, &amount).await,
        Commands::Batch {
            category,
            all,
            select,
            amounts,
            step_up,
            step_down,
            dry_run,
        } => {
            let opts = BatchOptions {
                category,
                all,
                select,
                amounts,
                step_up,
                step_down,
                dry_run,
            };
            commands::batch::run(&ctx, &opts).await
        }
        Commands::History { creator, limit } => {
            commands::history::run(&ctx.db, creator.as_deref(), limit)
        }
    }
}
