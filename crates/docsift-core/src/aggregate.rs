//! Batch assembly: per-page outputs into an ordered record sequence.

use crate::models::record::{AcquisitionResult, Batch, Enrichment, ExtractionRecord, FieldSet};

/// Assembles fully formed records into a batch.
///
/// Pure assembly: one record per acquisition result, appended in arrival
/// order, no deduplication or merging across pages. Output order is
/// deterministic whenever upstream outputs are, which is what makes exports
/// reproducible and row-order assertions possible. A record enters the
/// batch only once complete, so an aborted run never leaves a partial row.
#[derive(Debug, Default)]
pub struct RecordAggregator {
    records: Vec<ExtractionRecord>,
}

impl RecordAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fully formed record.
    pub fn push(
        &mut self,
        document_id: &str,
        acquisition: AcquisitionResult,
        fields: FieldSet,
        enrichment: Option<Enrichment>,
    ) {
        self.records.push(ExtractionRecord {
            document_id: document_id.to_string(),
            page_index: acquisition.page_index,
            method: acquisition.method,
            fields,
            raw_text: acquisition.text,
            enrichment,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finish the batch; records appear exactly in push order.
    pub fn finish(self) -> Batch {
        Batch {
            records: self.records,
        }
    }
}
