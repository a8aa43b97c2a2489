//! Process command - extract fields from a single document file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use docsift_core::Batch;

use super::{OutputFormat, build_pipeline, format_csv, format_text, load_config, load_document};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Extract one extra field anchored on this label (e.g. "Policy No")
    #[arg(short, long)]
    label: Option<String>,

    /// Skip the cloud OCR client even when a key is configured
    #[arg(long)]
    no_cloud: bool,

    /// Compute risk score and enrichment attributes
    #[arg(long)]
    enrich: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );

    pb.set_message("Loading document...");
    let document = load_document(&args.input)?;

    pb.set_message("Acquiring text...");
    let pipeline = build_pipeline(&config, args.no_cloud, args.label.as_deref(), args.enrich);

    // The pipeline is synchronous (and the cloud client blocks); keep it off
    // the async runtime's worker threads.
    let input_name = args.input.display().to_string();
    let records = tokio::task::spawn_blocking(move || pipeline.process(&document))
        .await?
        .map_err(|e| anyhow::anyhow!("{input_name}: {e}"))?;

    pb.finish_with_message("Done");

    let batch = Batch { records };
    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&batch.records)?,
        OutputFormat::Csv => format_csv(&batch)?,
        OutputFormat::Text => format_text(&batch),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
