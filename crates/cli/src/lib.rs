pub mod commands;
pub mod render;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use cartview_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "cartview",
    about = "Cartview shopping cart CLI",
    long_about = "Inspect and operate the persisted shopping cart against the product catalog.",
    after_help = "Examples:\n  cartview add iphone-15\n  cartview show --sort-by-price\n  cartview purchase\n  printf 'sort\\nremove iphone-15\\n' | cartview session"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Render the cart with its total and purchase state")]
    Show {
        #[arg(long, help = "Order entries by price, highest first")]
        sort_by_price: bool,
    },
    #[command(about = "Put a catalog product into the persisted cart")]
    Add { product_id: String },
    #[command(about = "Remove a product from the persisted cart")]
    Remove { product_id: String },
    #[command(about = "Purchase the cart, clearing all stored cart state")]
    Purchase,
    #[command(
        about = "Drive one mounted cart view with actions read from stdin",
        long_about = "Actions, one per line: show, sort, remove <id>, add-back <id>, purchase, close"
    )]
    Session,
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Show { sort_by_price } => commands::show::run(sort_by_price),
        Command::Add { product_id } => commands::add::run(&product_id),
        Command::Remove { product_id } => commands::remove::run(&product_id),
        Command::Purchase => commands::purchase::run(),
        Command::Session => commands::session::run(),
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr; stdout carries the command payload.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
