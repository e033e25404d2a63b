//! The `sales` subcommand: scrape every history page and print the table.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use soldhistory_lib::{validation, SalesScraper, ScrapeConfig};

use crate::output::{
    format_failure_warning, no_sales_warning, print_failure_warning, print_json, print_sales_csv,
    print_sales_markdown, print_sales_table, OutputFormat,
};

#[derive(Args)]
pub struct SalesArgs {
    /// Suburb names to search (quote names containing spaces)
    #[arg(required = true)]
    pub suburbs: Vec<String>,

    /// State or territory code (e.g. WA, NSW, VIC)
    #[arg(long)]
    pub state: String,

    /// History pages to request per suburb (1-30)
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Maximum requests in flight; 0 for no limit
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds; 0 for the HTTP client default
    #[arg(long)]
    pub timeout: Option<u64>,
}

pub async fn run(args: &SalesArgs, format: &OutputFormat) -> Result<()> {
    let state = validation::validate_state(&args.state)?;
    let suburbs = args
        .suburbs
        .iter()
        .map(|s| validation::validate_suburb(s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = ScrapeConfig::from_env();
    if let Some(pages) = args.max_pages {
        config.site.max_pages = validation::validate_max_pages(pages)?;
    }
    if let Some(limit) = args.concurrency {
        config.max_concurrency = (limit > 0).then_some(limit);
    }
    if let Some(secs) = args.timeout {
        config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }

    let scraper = SalesScraper::new(&config)?;
    let report = match scraper.scrape(&suburbs, &state).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(warning) = no_sales_warning(&e) {
                print_failure_warning(&warning, format);
            }
            return Err(e.into());
        }
    };

    eprintln!(
        "{} sales from {} listings ({} requests, {} failed)",
        report.table.len(),
        report.listings,
        report.requests,
        report.failures.len()
    );

    if !report.failures.is_empty() {
        let warning = format_failure_warning(&report.failure_summary(), report.requests);
        print_failure_warning(&warning, format);
    }

    match format {
        OutputFormat::Table => print_sales_table(&report.table),
        OutputFormat::Json => print_json(&report.table),
        OutputFormat::Csv => print_sales_csv(&report.table)?,
        OutputFormat::Markdown => print_sales_markdown(&report.table),
    }

    Ok(())
}
