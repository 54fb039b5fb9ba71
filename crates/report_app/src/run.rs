use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use report_core::PipelineConfig;
use report_engine::{FetchSettings, FixedIntervalPacer, ManifestWriter, Pipeline, ReqwestFetcher};
use report_logging::report_info;
use tokio_util::sync::CancellationToken;

pub struct RunOptions {
    pub config: PipelineConfig,
    pub fetch: FetchSettings,
    pub pacing: Duration,
    pub output: PathBuf,
}

/// Run the pipeline once and write the manifest. Nothing is written when the
/// run fails or is cancelled.
pub async fn run(options: RunOptions, cancel: &CancellationToken) -> anyhow::Result<PathBuf> {
    let (dir, filename) = split_output(&options.output)?;
    let pipeline = Pipeline::new(
        options.config,
        Arc::new(ReqwestFetcher::new(options.fetch)),
        Arc::new(FixedIntervalPacer::new(options.pacing)),
    );

    let manifest = pipeline
        .run_until_cancelled(cancel)
        .await
        .context("building the fly report")?;

    let path = ManifestWriter::new(dir)
        .write(&filename, &manifest)
        .context("writing the manifest")?;
    report_info!("Successfully wrote {}", path.display());
    Ok(path)
}

fn split_output(output: &Path) -> anyhow::Result<(PathBuf, String)> {
    let filename = output
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("output path {} has no file name", output.display()))?
        .to_string();
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, filename))
}
