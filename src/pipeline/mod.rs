//! The chunked, parallel descriptor pipeline.
//!
//! A run resolves the structure and name columns, deduplicates by name,
//! partitions the rows into at most `max_workers` chunks, computes every
//! chunk concurrently through a [`Dispatcher`], and concatenates the results
//! in the original row order.
//!
//! # Overview
//!
//! - [`Pipeline`]: Orchestrates one run
//! - [`PipelineConfig`]: Chunk size, worker bound, isolation, column patterns
//! - [`Dispatcher`]: [`ProcessDispatcher`] (default) or [`ThreadDispatcher`]
//! - [`RunReport`]: Row, chunk and parse-failure accounting for a run

mod aggregate;
mod columns;
mod compute;
mod config;
mod dispatch;
mod error;
mod partition;
mod prepare;

pub mod worker;

pub use aggregate::{Aggregate, aggregate};
pub use columns::{KeyColumns, resolve_column, resolve_key_columns};
pub use compute::{ChunkResult, ParseFailure, compute_chunk};
pub use config::{Isolation, PipelineConfig};
pub use dispatch::{Dispatcher, ProcessDispatcher, ThreadDispatcher};
pub use error::Error;
pub use partition::{chunk_count, chunk_sizes, partition};
pub use prepare::{PrepareReport, prepare};

use tracing::{debug, info};

use crate::model::descriptors::DESCRIPTOR_COLUMNS;
use crate::model::enriched::EnrichedTable;
use crate::model::table::MoleculeTable;
use crate::model::value::Value;

/// Accounting for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    pub structure_column: String,
    pub name_column: String,
    pub rows_in: usize,
    pub duplicates_dropped: usize,
    pub rows_out: usize,
    /// Row count of each chunk, in partition order.
    pub chunk_sizes: Vec<usize>,
    pub parse_failures: usize,
    pub lipinski_passes: usize,
}

impl RunReport {
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunk_sizes.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub table: EnrichedTable,
    pub report: RunReport,
}

pub struct Pipeline<D> {
    config: PipelineConfig,
    dispatcher: D,
}

impl<D: Dispatcher> Pipeline<D> {
    pub fn new(config: PipelineConfig, dispatcher: D) -> Self {
        Self { config, dispatcher }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the whole pipeline over `table`.
    ///
    /// Missing key columns and invalid partition parameters fail before any
    /// computation starts. Any worker failure fails the whole run.
    pub fn run(&self, table: MoleculeTable) -> Result<PipelineOutput, Error> {
        self.config.validate()?;

        let keys = resolve_key_columns(&table, &self.config)?;
        debug!(structure = %keys.structure, name = %keys.name, "resolved key columns");

        let (prepared, prep) = prepare(table, &keys.structure, &keys.name)?;
        let mut report = RunReport {
            structure_column: keys.structure,
            name_column: keys.name,
            rows_in: prep.rows_in,
            duplicates_dropped: prep.duplicates_dropped,
            rows_out: prep.rows_out,
            ..Default::default()
        };

        if prepared.is_empty() {
            info!("input has no rows; nothing to compute");
            let columns = std::iter::once(prepared.columns[0].clone())
                .chain(prepared.columns[2..].iter().cloned())
                .chain(DESCRIPTOR_COLUMNS.iter().map(|c| c.to_string()))
                .collect();
            let table = EnrichedTable::new(report.name_column.clone(), columns);
            return Ok(PipelineOutput { table, report });
        }

        let chunks = partition(prepared, &self.config)?;
        report.chunk_sizes = chunks.iter().map(|c| c.row_count()).collect();
        info!(
            rows = report.rows_out,
            chunks = report.chunk_count(),
            isolation = ?self.config.isolation,
            "computing descriptors"
        );

        let results = self.dispatcher.dispatch(chunks)?;
        if results.len() != report.chunk_sizes.len() {
            return Err(Error::worker_failure(
                results.len().min(report.chunk_sizes.len()),
                format!(
                    "dispatcher returned {} results for {} chunks",
                    results.len(),
                    report.chunk_sizes.len()
                ),
            ));
        }
        for (result, &expected) in results.iter().zip(&report.chunk_sizes) {
            let found = result.table.row_count();
            if found != expected {
                return Err(Error::worker_failure(
                    result.index,
                    format!("returned {found} rows, expected {expected}"),
                ));
            }
        }

        let Aggregate {
            table,
            parse_failures,
        } = aggregate(results)?;

        report.parse_failures = parse_failures;
        report.lipinski_passes = count_lipinski_passes(&table);
        info!(
            rows = table.row_count(),
            parse_failures, "descriptor computation finished"
        );

        Ok(PipelineOutput { table, report })
    }
}

fn count_lipinski_passes(table: &EnrichedTable) -> usize {
    let Some(col) = table.column_index(DESCRIPTOR_COLUMNS[6]) else {
        return 0;
    };
    table
        .rows
        .iter()
        .filter(|row| row.values.get(col) == Some(&Value::Bool(true)))
        .count()
}
