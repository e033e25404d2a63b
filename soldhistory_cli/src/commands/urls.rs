//! The `urls` subcommand: print the search URLs without fetching them.

use anyhow::Result;
use clap::Args;
use soldhistory_lib::{build_urls, validation, ScrapeConfig};

use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct UrlsArgs {
    /// Suburb names to search (quote names containing spaces)
    #[arg(required = true)]
    pub suburbs: Vec<String>,

    /// State or territory code (e.g. WA, NSW, VIC)
    #[arg(long)]
    pub state: String,

    /// History pages per suburb (1-30)
    #[arg(long)]
    pub max_pages: Option<u32>,
}

pub fn run(args: &UrlsArgs, format: &OutputFormat) -> Result<()> {
    let state = validation::validate_state(&args.state)?;
    let suburbs = args
        .suburbs
        .iter()
        .map(|s| validation::validate_suburb(s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut site = ScrapeConfig::from_env().site;
    if let Some(pages) = args.max_pages {
        site.max_pages = validation::validate_max_pages(pages)?;
    }

    let urls: Vec<String> = build_urls(&suburbs, &state, &site)?
        .map(String::from)
        .collect();

    match format {
        OutputFormat::Json => print_json(&urls),
        _ => {
            for url in &urls {
                println!("{}", url);
            }
        }
    }

    Ok(())
}
