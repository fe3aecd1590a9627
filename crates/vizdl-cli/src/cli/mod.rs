//! CLI for the vizdl Power BI visuals downloader.

mod run;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use vizdl_core::config::{self, Overrides};
use vizdl_core::filter::DownloadFilter;

use run::run_download;

/// Download every Power BI custom visual listed in AppSource.
#[derive(Debug, Parser)]
#[command(name = "vizdl", version)]
#[command(about = "Bulk-download Power BI custom visuals from the AppSource catalog", long_about = None)]
pub struct Cli {
    /// Only download visuals carrying the Power BI certified tag.
    #[arg(long, visible_alias = "certified")]
    pub certified_only: bool,

    /// Only download visuals published by Microsoft Corporation.
    #[arg(long, visible_alias = "microsoft")]
    pub microsoft_only: bool,

    /// Retries after the first attempt of each page fetch or download [config default: 3].
    #[arg(long, value_name = "N")]
    pub retry_count: Option<u32>,

    /// Per-request timeout in seconds [config default: 30].
    #[arg(long, value_name = "SECS")]
    pub timeout_seconds: Option<u64>,

    /// Fixed pause between attempts in seconds [config default: 5].
    #[arg(long, value_name = "SECS")]
    pub retry_delay_secs: Option<f64>,

    /// Destination folder [config default: ./downloads].
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Read configuration from this file instead of ~/.config/vizdl/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        run_download(&cfg, &cli.overrides(), cli.filter())
    }

    pub fn filter(&self) -> DownloadFilter {
        DownloadFilter::new(self.certified_only, self.microsoft_only)
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            retry_count: self.retry_count,
            retry_delay_secs: self.retry_delay_secs,
            timeout_secs: self.timeout_seconds,
            download_dir: self.output_dir.clone(),
        }
    }
}
