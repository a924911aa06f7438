use clap::{Args, Parser, Subcommand};
use listing_alerts::{
    Config, DirectoryMailbox, clean_listings, load_store, pipeline, save_store, telemetry,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "listing-alerts",
    about = "Collect real-estate listing alerts from a mailbox into a JSON store",
    version
)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan recent alert emails and update the store (default command)
    Scan,
    /// Drop stored listings with unusable addresses or prices
    Clean,
}

#[derive(Args, Debug, Default)]
struct PathArgs {
    /// Override LISTINGS_STORE_PATH
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Override LISTINGS_MAILBOX_DIR
    #[arg(long, global = true)]
    mailbox: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(store) = cli.paths.store {
        config.store_path = store;
    }
    if let Some(mailbox) = cli.paths.mailbox {
        config.mailbox_dir = mailbox;
    }

    if let Err(e) = telemetry::init(&config.log_level) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match cli.command.unwrap_or(Command::Scan) {
        Command::Scan => {
            let mut mailbox = DirectoryMailbox::new(&config.mailbox_dir);
            let new_count = pipeline::run_or_zero(&config, &mut mailbox);
            println!("{new_count}");
            ExitCode::SUCCESS
        }
        Command::Clean => match clean(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Cleanup failed: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

fn clean(config: &Config) -> listing_alerts::Result<()> {
    let mut store = load_store(&config.store_path)?;
    info!("Starting with {} listings", store.len());

    let (listings, report) = clean_listings(store.listings);
    store.listings = listings;
    info!(
        "Kept {} listings ({} cleaned, {} removed)",
        report.kept, report.cleaned, report.removed
    );

    save_store(&config.store_path, &store)
}
