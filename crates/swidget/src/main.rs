//! Swidget - Entry Point
//!
//! Binary entry point of the `swidget` host CLI. Lives in the facade crate so
//! the linked bundle sources and demo entry point are registered.

// Force-link swidget-providers to ensure linkme registrations are included
extern crate swidget_providers;

use clap::Parser;
use swidget::cli::{Cli, run};

/// Main entry point for the swidget host
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}
