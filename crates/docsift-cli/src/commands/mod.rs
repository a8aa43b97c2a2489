//! CLI subcommands and shared plumbing.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;
use std::sync::Arc;

use docsift_core::models::config::DocsiftConfig;
use docsift_core::{
    Batch, CloudVisionOcr, Document, DocumentPipeline, EnrichmentAnalyzer,
    FieldExtractionEngine, MediaKind, PageTextSource, TesseractOcr,
};

/// Environment variable holding the Cloud Vision API key. Its presence is
/// the only thing that makes the cloud OCR path exist.
pub const VISION_KEY_ENV: &str = "DOCSIFT_VISION_API_KEY";

/// Shared output format for process and batch.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON records
    Json,
    /// Flat CSV table
    Csv,
    /// Plain text summary
    Text,
}

/// Build the processing pipeline from configuration and flags.
pub fn build_pipeline(
    config: &DocsiftConfig,
    no_cloud: bool,
    label: Option<&str>,
    enrich: bool,
) -> DocumentPipeline {
    let local = Arc::new(TesseractOcr::new(&config.acquire.ocr_language));
    let mut source = PageTextSource::new(local, config.acquire.clone());

    if !no_cloud {
        if let Ok(key) = std::env::var(VISION_KEY_ENV) {
            match CloudVisionOcr::new(key) {
                Ok(client) => source = source.with_cloud(Arc::new(client)),
                Err(e) => tracing::warn!("cloud OCR client unavailable: {e}"),
            }
        }
    }

    let engine = FieldExtractionEngine::from_config(&config.extract);
    let mut pipeline = DocumentPipeline::new(source, engine);

    if enrich {
        pipeline = pipeline.with_enrichment(EnrichmentAnalyzer::new(config.enrich.clone()));
    }
    if let Some(label) = label {
        pipeline = pipeline.with_custom_label(label);
    }
    pipeline
}

/// Load a document from disk, inferring its media kind from the extension.
pub fn load_document(path: &Path) -> anyhow::Result<Document> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let kind = MediaKind::from_extension(extension)
        .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;

    let bytes = std::fs::read(path)?;
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    Ok(Document::new(id, kind, bytes))
}

/// Load configuration from an explicit path or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocsiftConfig> {
    match config_path {
        Some(path) => Ok(DocsiftConfig::from_file(Path::new(path))?),
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                Ok(DocsiftConfig::from_file(&default_path)?)
            } else {
                Ok(DocsiftConfig::default())
            }
        }
    }
}

/// Serialize a batch as a flat, column-uniform CSV table.
///
/// The same columns appear for every row; missing fields render as
/// "Not Found" so spreadsheets need no per-row schema handling.
pub fn format_csv(batch: &Batch) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let custom_label = batch.custom_label();
    let has_enrichment = batch.iter().any(|r| r.enrichment.is_some());

    let mut headers = vec![
        "document".to_string(),
        "page".to_string(),
        "method".to_string(),
        "name".to_string(),
        "date".to_string(),
        "amount".to_string(),
    ];
    if let Some(label) = custom_label {
        headers.push(label.to_string());
    }
    if has_enrichment {
        headers.push("risk_score".to_string());
    }
    headers.push("text".to_string());
    writer.write_record(&headers)?;

    for record in batch.iter() {
        let mut row = vec![
            record.document_id.clone(),
            record.page_index.to_string(),
            record.method.to_string(),
            record.fields.name.column_text().to_string(),
            record.fields.date.column_text().to_string(),
            record.fields.amount.column_text().to_string(),
        ];
        if custom_label.is_some() {
            row.push(
                record
                    .fields
                    .custom
                    .as_ref()
                    .map(|c| c.value.column_text())
                    .unwrap_or("Not Found")
                    .to_string(),
            );
        }
        if has_enrichment {
            row.push(
                record
                    .enrichment
                    .as_ref()
                    .map(|e| e.risk_score.to_string())
                    .unwrap_or_default(),
            );
        }
        row.push(record.raw_text.replace(['\n', '\r'], " "));
        writer.write_record(&row)?;
    }

    Ok(String::from_utf8(writer.into_inner()?)?)
}

/// Render a batch as a plain text summary, one block per record.
pub fn format_text(batch: &Batch) -> String {
    let mut output = String::new();

    for record in batch.iter() {
        output.push_str(&format!(
            "{} page {} ({})\n",
            record.document_id, record.page_index, record.method
        ));
        output.push_str(&format!("  Name:   {}\n", record.fields.name));
        output.push_str(&format!("  Date:   {}\n", record.fields.date));
        output.push_str(&format!("  Amount: {}\n", record.fields.amount));
        if let Some(custom) = &record.fields.custom {
            output.push_str(&format!("  {}: {}\n", custom.label, custom.value));
        }
        if let Some(enrichment) = &record.enrichment {
            output.push_str(&format!("  Risk:   {}/100\n", enrichment.risk_score));
            if !enrichment.entities.is_empty() {
                let listed: Vec<String> = enrichment
                    .entities
                    .iter()
                    .take(10)
                    .map(|e| format!("{} ({})", e.text, e.category))
                    .collect();
                output.push_str(&format!("  Entities: {}\n", listed.join(", ")));
            }
            if let Some(summary) = &enrichment.summary {
                output.push_str(&format!("  Summary: {}\n", summary));
            }
        }
        output.push('\n');
    }

    output
}
