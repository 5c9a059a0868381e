mod cli;
mod conversions;
mod error;
mod fmt;
mod importer;
mod matcher;
mod models;
mod settings;
mod sync;
mod ynab;

use std::path::Path;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ListCommands};
use error::Result;
use ynab::{Session, YnabClient};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = settings::load_settings();
    let token = settings::load_token(Path::new(&settings.token_file))?;
    let client = YnabClient::connect(&settings.api_url, token)?;
    let budget = cli.budget.as_deref().or(settings.budget.as_deref());
    let session = Session::open(&client, budget)?;
    let verbose = cli.verbose > 0;

    match cli.command {
        Commands::List { command } => match command {
            ListCommands::Budgets => cli::list::budgets(&session, verbose),
            ListCommands::Accounts => cli::list::accounts(&session, verbose),
            ListCommands::Transactions {
                source,
                since,
                kind,
                server_knowledge,
            } => cli::list::transactions(&session, &source, since, kind, server_knowledge),
        },
        Commands::Upload {
            account,
            source,
            dry_run,
        } => cli::upload::run(&session, &account, &source, dry_run),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
