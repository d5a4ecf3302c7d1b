use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chem::ChemistryEngine;
use crate::model::descriptors::{DESCRIPTOR_COLUMNS, DescriptorSet};
use crate::model::enriched::{EnrichedRow, EnrichedTable};
use crate::model::table::Chunk;
use crate::model::value::Value;

/// The computed fragment for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResult {
    /// Partition index of the chunk this result belongs to.
    pub index: usize,
    pub table: EnrichedTable,
    /// Rows whose structure could not be parsed, in row order.
    pub failures: Vec<ParseFailure>,
}

impl ChunkResult {
    #[inline]
    pub fn parse_failures(&self) -> usize {
        self.failures.len()
    }
}

/// A row whose structure the engine rejected.
///
/// Failures travel back with the result so the parent can report them
/// whether the chunk ran in a thread or in a worker process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    /// Name-column value of the row.
    pub molecule: String,
    pub detail: String,
}

/// Computes descriptors for every row of `chunk`.
///
/// A row whose structure does not parse keeps its other cells and gets
/// `Null` in every descriptor column; the failure is recorded in the result.
pub fn compute_chunk<E: ChemistryEngine>(chunk: &Chunk, engine: &E) -> ChunkResult {
    let name_idx = chunk.name_column;
    let structure_idx = chunk.structure_column;

    let columns: Vec<String> = chunk
        .table
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != name_idx)
        .map(|(_, c)| c.clone())
        .chain(DESCRIPTOR_COLUMNS.iter().map(|c| c.to_string()))
        .collect();
    let mut table = EnrichedTable::new(chunk.name_column_name(), columns);

    let mut failures = Vec::new();
    for row in &chunk.table.rows {
        let key = row.get(name_idx).map(Value::to_key).unwrap_or_default();
        let structure = row.get(structure_idx).map(Value::to_key).unwrap_or_default();

        let descriptors = match engine.parse(&structure) {
            Ok(molecule) => engine.descriptors(&molecule).to_values(),
            Err(err) => {
                failures.push(ParseFailure {
                    molecule: key.clone(),
                    detail: err.to_string(),
                });
                DescriptorSet::missing_values()
            }
        };

        let mut values: Vec<Value> = (0..chunk.table.column_count())
            .filter(|&i| i != name_idx)
            .map(|i| row.get(i).cloned().unwrap_or_default())
            .collect();
        values.extend(descriptors);

        table.rows.push(EnrichedRow { key, values });
    }

    debug!(
        chunk = chunk.index,
        rows = table.row_count(),
        parse_failures = failures.len(),
        "chunk computed"
    );

    ChunkResult {
        index: chunk.index,
        table,
        failures,
    }
}
