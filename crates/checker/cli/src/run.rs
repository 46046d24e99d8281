//! Status list loading and the scan itself.

use color_eyre::eyre::Result;
use keybox_revocation::{FileStatusSource, HttpStatusSource, RevocationList, StatusSource};
use keybox_scan::{ScanReport, Scanner};

use crate::{Cli, Config};

/// Load the status list from `--status-file`, or fetch it from the
/// configured URL.
pub async fn load_status_list(cli: &Cli, config: &Config) -> Result<RevocationList> {
    match &cli.status_file {
        Some(path) => fetch(&FileStatusSource::new(path)).await,
        None => fetch(&HttpStatusSource::new(&config.status_url, config.timeout())?).await,
    }
}

async fn fetch<S: StatusSource>(source: &S) -> Result<RevocationList> {
    let list = source.fetch().await?;
    if list.is_empty() {
        tracing::warn!("status list has no entries");
    }
    Ok(list)
}

/// Load the status list, then scan `cli.path`.
///
/// No file is examined or moved when the list cannot be loaded.
pub async fn run(cli: &Cli, config: &Config) -> Result<ScanReport> {
    let list = match load_status_list(cli, config).await {
        Ok(list) => list,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch or parse status list");
            return Err(e.wrap_err("unable to proceed without a valid revocation list"));
        }
    };

    Scanner::new(list, config.scan_options()).scan_dir(&cli.path)
}
