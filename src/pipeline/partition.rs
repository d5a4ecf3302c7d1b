use super::config::PipelineConfig;
use super::error::Error;
use crate::model::table::{Chunk, MoleculeTable};

/// Number of chunks for `rows` rows.
///
/// `ceil(rows / chunk_size)`, but when that exceeds `max_workers` the count
/// drops to `max_workers - 1`. Zero rows give zero chunks.
pub fn chunk_count(rows: usize, config: &PipelineConfig) -> Result<usize, Error> {
    if rows == 0 {
        return Ok(0);
    }
    let invalid = || Error::InvalidPartition {
        rows,
        chunk_size: config.chunk_size,
        max_workers: config.max_workers,
    };
    if config.chunk_size == 0 {
        return Err(invalid());
    }

    let mut count = rows.div_ceil(config.chunk_size);
    if count > config.max_workers {
        count = config.max_workers.checked_sub(1).ok_or_else(invalid)?;
    }
    if count == 0 {
        return Err(invalid());
    }
    Ok(count)
}

/// Row count of each chunk: as equal as possible, larger chunks first.
pub fn chunk_sizes(rows: usize, chunks: usize) -> Vec<usize> {
    if chunks == 0 {
        return Vec::new();
    }
    let base = rows / chunks;
    let extra = rows % chunks;
    (0..chunks).map(|i| base + usize::from(i < extra)).collect()
}

/// Splits a prepared table into contiguous, order-preserving chunks.
///
/// Expects the structure column at position 0 and the name column at 1.
pub fn partition(table: MoleculeTable, config: &PipelineConfig) -> Result<Vec<Chunk>, Error> {
    let count = chunk_count(table.row_count(), config)?;
    let sizes = chunk_sizes(table.row_count(), count);

    let columns = table.columns;
    let mut rows = table.rows.into_iter();
    let chunks = sizes
        .into_iter()
        .enumerate()
        .map(|(index, size)| Chunk {
            index,
            structure_column: 0,
            name_column: 1,
            table: MoleculeTable {
                columns: columns.clone(),
                rows: rows.by_ref().take(size).collect(),
            },
        })
        .collect();

    Ok(chunks)
}
