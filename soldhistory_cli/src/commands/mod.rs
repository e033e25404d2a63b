//! CLI subcommand implementations.

pub mod sales;
pub mod urls;
