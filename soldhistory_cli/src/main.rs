mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "soldhistory")]
#[command(about = "Scrape historical property sales for Australian suburbs")]
struct Cli {
    /// Output format: table, markdown, csv or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape sold history and print it newest first
    Sales(commands::sales::SalesArgs),
    /// Print the search URLs a scrape would request
    Urls(commands::urls::UrlsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("soldhistory=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Sales(args) => commands::sales::run(args, &format).await?,
        Commands::Urls(args) => commands::urls::run(args, &format)?,
    }

    Ok(())
}
