use std::fmt::Display;

use anyhow::Result;
use serde::Serialize;
use soldhistory_lib::types::SaleRecord;
use soldhistory_lib::{FailureCount, SalesError, SalesTable};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct SaleRow {
    #[tabled(rename = "Address")]
    #[serde(rename = "Address")]
    address: String,
    #[tabled(rename = "Suburb")]
    #[serde(rename = "Suburb")]
    suburb: String,
    #[tabled(rename = "State")]
    #[serde(rename = "State")]
    state: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    property_type: String,
    #[tabled(rename = "Sell Price")]
    #[serde(rename = "Sell Price")]
    sell_price: String,
    #[tabled(rename = "Sell Date")]
    #[serde(rename = "Sell Date")]
    sell_date: String,
    #[tabled(rename = "Bedrooms")]
    #[serde(rename = "Bedrooms")]
    bedrooms: String,
    #[tabled(rename = "Bathrooms")]
    #[serde(rename = "Bathrooms")]
    bathrooms: String,
    #[tabled(rename = "Car Ports")]
    #[serde(rename = "Car Ports")]
    car_ports: String,
    #[tabled(rename = "Land Size")]
    #[serde(rename = "Land Size")]
    land_size: String,
    #[tabled(rename = "Building Size")]
    #[serde(rename = "Building Size")]
    building_size: String,
    #[tabled(rename = "Previous Sale")]
    #[serde(rename = "Previous Sale")]
    is_previous_sale: bool,
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Count")]
    count: usize,
}

// -- Row builders --

fn build_sale_rows(records: &[SaleRecord]) -> Vec<SaleRow> {
    records
        .iter()
        .map(|r| SaleRow {
            address: r.address.clone(),
            suburb: r.suburb.clone(),
            state: r.state.clone(),
            property_type: opt(r.property_type),
            sell_price: opt(r.sell_price),
            sell_date: opt(r.sell_date),
            bedrooms: opt(r.bedrooms),
            bathrooms: opt(r.bathrooms),
            car_ports: opt(r.car_ports),
            land_size: opt(r.land_size),
            building_size: opt(r.building_size),
            is_previous_sale: r.is_previous_sale,
        })
        .collect()
}

fn build_failure_rows(summary: &[FailureCount]) -> Vec<FailureRow> {
    summary
        .iter()
        .map(|f| FailureRow {
            status: f.status_label(),
            reason: f.reason.clone(),
            count: f.count,
        })
        .collect()
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// -- Table output --

pub fn print_sales_table(table: &SalesTable) {
    println!("{}", Table::new(build_sale_rows(table.records())));
}

// -- Markdown output --

pub fn print_sales_markdown(table: &SalesTable) {
    let mut out = Table::new(build_sale_rows(table.records()));
    out.with(Style::markdown());
    println!("{}", out);
}

// -- CSV output --

pub fn print_sales_csv(table: &SalesTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_sale_rows(table.records()) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Failure warning --

/// Warning banner plus a status/reason/count table, most frequent first.
pub fn format_failure_warning(summary: &[FailureCount], requests: usize) -> String {
    let failed: usize = summary.iter().map(|f| f.count).sum();
    format!(
        "Warning: {} of {} requests failed\n{}",
        failed,
        requests,
        Table::new(build_failure_rows(summary))
    )
}

/// The failure warning for a run that produced no sales, if any request failed.
pub fn no_sales_warning(err: &SalesError) -> Option<String> {
    match err {
        SalesError::NoSales {
            requests, summary, ..
        } if !summary.is_empty() => Some(format_failure_warning(summary, *requests)),
        _ => None,
    }
}

/// Prints to stdout for human formats and stderr for machine formats.
pub fn print_failure_warning(warning: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Table | OutputFormat::Markdown => println!("{}", warning),
        OutputFormat::Csv | OutputFormat::Json => eprintln!("{}", warning),
    }
}
