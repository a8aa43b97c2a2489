//! Batch processing command for multiple document files.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{error, warn};

use docsift_core::{Batch, parse_amount};

use super::{OutputFormat, build_pipeline, format_csv, format_text, load_config, load_document};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output file for the combined table (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Extract one extra field anchored on this label
    #[arg(short, long)]
    label: Option<String>,

    /// Skip the cloud OCR client even when a key is configured
    #[arg(long)]
    no_cloud: bool,

    /// Compute risk score and enrichment attributes
    #[arg(long)]
    enrich: bool,

    /// Continue when a document cannot be decoded
    #[arg(long)]
    continue_on_error: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern; order of expansion is the arrival order of the
    // batch, and therefore the row order of the output.
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "pdf" | "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let pipeline = Arc::new(build_pipeline(
        &config,
        args.no_cloud,
        args.label.as_deref(),
        args.enrich,
    ));

    let mut batch = Batch::default();
    let mut failures: Vec<(PathBuf, String)> = Vec::new();

    for path in &files {
        // Processing is synchronous; run each document off the runtime's
        // worker threads.
        let result = match load_document(path) {
            Ok(document) => {
                let pipeline = Arc::clone(&pipeline);
                tokio::task::spawn_blocking(move || pipeline.process(&document))
                    .await
                    .map_err(anyhow::Error::from)
                    .and_then(|r| r.map_err(|e| anyhow::anyhow!("{e}")))
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(mut records) => batch.records.append(&mut records),
            Err(e) => {
                if args.continue_on_error {
                    warn!("failed to process {}: {e}", path.display());
                    failures.push((path.clone(), e.to_string()));
                } else {
                    error!("failed to process {}: {e}", path.display());
                    anyhow::bail!("Processing failed: {e}");
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&batch.records)?,
        OutputFormat::Csv => format_csv(&batch)?,
        OutputFormat::Text => format_text(&batch),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Table written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    print_summary(&batch, &failures, start.elapsed());

    Ok(())
}

fn print_summary(batch: &Batch, failures: &[(PathBuf, String)], elapsed: std::time::Duration) {
    let mut method_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in batch.iter() {
        *method_counts.entry(record.method.as_str()).or_default() += 1;
    }

    let amount_total: Decimal = batch
        .iter()
        .filter_map(|r| r.fields.amount.as_str())
        .filter_map(parse_amount)
        .sum();

    println!();
    println!(
        "{} {} records from {} documents in {:.1?} (finished {})",
        style("✓").green(),
        batch.len(),
        batch
            .iter()
            .map(|r| r.document_id.as_str())
            .collect::<std::collections::BTreeSet<_>>()
            .len(),
        elapsed,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    );

    for (method, count) in &method_counts {
        println!("   {}: {}", method, count);
    }

    if !amount_total.is_zero() {
        println!("   recognized amounts sum to {}", amount_total);
    }

    if !failures.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for (path, reason) in failures {
            println!("  - {}: {}", path.display(), reason);
        }
    }
}
