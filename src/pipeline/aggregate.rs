use tracing::warn;

use super::compute::ChunkResult;
use super::error::Error;
use crate::model::enriched::EnrichedTable;

/// The concatenated output of every chunk.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregate {
    pub table: EnrichedTable,
    pub parse_failures: usize,
}

/// Concatenates chunk fragments in partition order.
///
/// Results must arrive as chunks `0, 1, .., n-1`; a gap, repeat or
/// reordering means the dispatcher lost or misplaced a chunk and is reported
/// as a worker failure for the first offending position. Every recorded
/// parse failure is logged as a warning naming the molecule.
pub fn aggregate(results: Vec<ChunkResult>) -> Result<Aggregate, Error> {
    let mut out = Aggregate::default();

    for (position, result) in results.into_iter().enumerate() {
        if result.index != position {
            return Err(Error::worker_failure(
                position,
                format!(
                    "result for chunk {} arrived in position {position}",
                    result.index
                ),
            ));
        }
        for failure in &result.failures {
            warn!(
                chunk = position,
                molecule = %failure.molecule,
                error = %failure.detail,
                "structure not parsed"
            );
        }
        out.parse_failures += result.parse_failures();
        out.table
            .extend_from(result.table)
            .map_err(|detail| Error::worker_failure(position, detail))?;
    }

    Ok(out)
}
