//! `vizdl` – walk the catalog and download every matching visual.

use anyhow::{Context, Result};
use std::fs;
use vizdl_core::catalog::CurlCatalog;
use vizdl_core::config::{Overrides, Settings, VizdlConfig};
use vizdl_core::filter::DownloadFilter;
use vizdl_core::pagination::{EntryOutcome, PaginationLoop};

pub fn run_download(cfg: &VizdlConfig, overrides: &Overrides, filter: DownloadFilter) -> Result<()> {
    let settings = Settings::resolve(cfg, overrides)?;
    tracing::info!(
        certified_only = filter.certified_only,
        microsoft_only = filter.microsoft_only,
        retries = settings.retry_policy.max_retries,
        delay = ?settings.retry_policy.delay,
        timeout = ?settings.timeout,
        "starting catalog walk"
    );

    fs::create_dir_all(&settings.download_dir).with_context(|| {
        format!(
            "failed to create download folder {}",
            settings.download_dir.display()
        )
    })?;
    println!("Downloading to {}", settings.download_dir.display());

    let catalog = CurlCatalog::new(
        settings.catalog_url.clone(),
        settings.accept_language.clone(),
        settings.timeout,
    );
    let summary = PaginationLoop::new(
        &catalog,
        filter,
        settings.retry_policy,
        settings.download_dir.clone(),
    )
    .with_observer(|entry, outcome| match outcome {
        EntryOutcome::Downloaded { path, bytes } => {
            println!("  ok    {} -> {} ({} bytes)", entry.title, path.display(), bytes);
        }
        EntryOutcome::Skipped(reason) => {
            println!("  skip  {} ({})", entry.title, reason);
        }
        EntryOutcome::Failed(err) => {
            println!("  FAIL  {} ({}: {})", entry.title, err, err.source);
        }
    })
    .run()?;

    println!("Done: {}", summary);
    Ok(())
}
