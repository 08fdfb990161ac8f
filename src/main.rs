// Command-line entry point: stands in for the file picker and download links.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use webp_converter_lib::core::{Progress, ProgressType};
use webp_converter_lib::utils::{format_file_size, format_signed_file_size, write_output};
use webp_converter_lib::{
    AppState, BatchConfig, SourceFile, convert_images, export_archive, get_state, get_summary,
    save_converted,
};

#[derive(Parser)]
#[command(name = "webp-converter", version, about = "Convert JPG/PNG images to WebP")]
struct Cli {
    /// Images to convert (JPG or PNG; only the first 20 are processed)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// WebP quality (10-100)
    #[arg(short, long)]
    quality: Option<u32>,
    /// Directory to write converted images into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// Also pack every converted image into one ZIP archive
    #[arg(long)]
    zip: bool,
    /// JSON config file (quality, maxFiles, archiveName)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print results and summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn log_progress(progress: &Progress) {
    if progress.progress_type != ProgressType::Progress {
        return;
    }
    let name = progress.file_name.as_deref().unwrap_or_default();
    match &progress.error {
        Some(error) => warn!(
            "[{}/{}] {}: {}",
            progress.completed_tasks, progress.total_tasks, name, error
        ),
        None => info!(
            "[{}/{}] {} ({}%)",
            progress.completed_tasks, progress.total_tasks, name, progress.progress_percentage
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_writer(std::io::stderr) // stdout is reserved for --json
        .compact()
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BatchConfig::load(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BatchConfig::default(),
    };

    let mut files = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        match SourceFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    let state = AppState::with_progress_sink(config, Arc::new(log_progress));
    let report = convert_images(&state, files, cli.quality)
        .await
        .context("converting images")?;

    if let Some(advisory) = report.advisory {
        if advisory.is_blocking() {
            bail!("{}", advisory);
        }
        warn!("{}", advisory);
    }

    let written = save_converted(&state, &cli.out_dir)
        .await
        .with_context(|| format!("writing images to {}", cli.out_dir.display()))?;
    info!("Wrote {} images to {}", written.len(), cli.out_dir.display());

    if cli.zip {
        let archive = export_archive(&state).await.context("building archive")?;
        let path = write_output(&cli.out_dir, &archive.filename, &archive.data).await?;
        info!("Archive written to {}", path.display());
    }

    let snapshot = get_state(&state).await;
    let summary = get_summary(&state).await;
    if cli.json {
        let output = serde_json::json!({
            "report": report,
            "results": snapshot.results,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for result in &snapshot.results {
            match (result.reduction_percent, result.error) {
                (Some(reduction), _) => println!(
                    "{:<32} {:>10} -> {:>10}  {:>6.1}%",
                    result.filename,
                    format_file_size(result.original_size),
                    format_file_size(result.converted_size),
                    reduction
                ),
                (None, error) => println!(
                    "{:<32} {}",
                    result.filename,
                    error.map(|e| e.to_string()).unwrap_or_default()
                ),
            }
        }
        println!(
            "{} converted, {} failed, {} saved, {:.1}% average reduction",
            summary.converted,
            summary.failed,
            format_signed_file_size(summary.total_savings),
            summary.average_reduction
        );
    }

    Ok(())
}
