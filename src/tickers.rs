// =============================================================================
// Ticker Index — static symbol table for autocomplete
// =============================================================================
//
// Loaded once at startup from a CSV with `Symbol` and `Name` columns and
// never written again, so concurrent reads need no locking. Rows missing
// either field are dropped at load time. Lookups are case-insensitive
// substring matches against both columns, capped at ten results in load
// order — stable, not relevance-ranked.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Maximum number of records a single search returns.
const MAX_RESULTS: usize = 10;

/// One row of the symbol table. Serialized with the CSV column names so the
/// autocomplete payload matches the table headers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TickerRecord {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Read-only symbol table, loaded once per process.
pub struct TickerIndex {
    records: Vec<TickerRecord>,
}

impl TickerIndex {
    /// Load the index from a CSV file at `path`.
    ///
    /// Rows with an empty symbol or name — and rows that fail to parse — are
    /// dropped rather than failing the load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open ticker table at {}", path.display()))?;

        let mut records = Vec::new();
        let mut dropped = 0usize;
        for row in reader.deserialize::<TickerRecord>() {
            match row {
                Ok(rec) if !rec.symbol.trim().is_empty() && !rec.name.trim().is_empty() => {
                    records.push(rec);
                }
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(dropped, "ticker rows missing symbol or name were dropped");
        }
        info!(count = records.len(), path = %path.display(), "ticker index loaded");

        Ok(Self { records })
    }

    /// An index with no records. Every search returns an empty result.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Build an index directly from records, preserving their order.
    pub fn from_records(records: Vec<TickerRecord>) -> Self {
        Self { records }
    }

    /// Case-insensitive substring search against symbol or name.
    ///
    /// Returns at most [`MAX_RESULTS`] matches in load order. An empty query
    /// matches everything (still capped). Never fails — an empty index just
    /// yields an empty result.
    pub fn search(&self, query: &str) -> Vec<&TickerRecord> {
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.symbol.to_lowercase().contains(&needle)
                    || r.name.to_lowercase().contains(&needle)
            })
            .take(MAX_RESULTS)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
