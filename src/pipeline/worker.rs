//! Wire format between the pipeline and process-isolated workers.
//!
//! The parent writes one JSON [`WorkerRequest`] to the child's stdin and
//! closes it; the child answers with one JSON [`WorkerResponse`] on stdout
//! and exits with status 0. Anything the child writes to stderr is treated
//! as diagnostics.

use std::borrow::Cow;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::compute::{ChunkResult, compute_chunk};
use crate::chem::ChemistryEngine;
use crate::io::error::Error;
use crate::model::table::Chunk;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest<'a> {
    pub chunk: Cow<'a, Chunk>,
}

impl<'a> WorkerRequest<'a> {
    pub fn borrowed(chunk: &'a Chunk) -> Self {
        Self {
            chunk: Cow::Borrowed(chunk),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub result: ChunkResult,
}

/// Reads one request from `reader`, computes it, and writes the response.
///
/// Returns the partition index that was served.
pub fn serve<R, W, E>(reader: R, mut writer: W, engine: &E) -> Result<usize, Error>
where
    R: Read,
    W: Write,
    E: ChemistryEngine,
{
    let request: WorkerRequest<'static> = serde_json::from_reader(reader)?;
    let chunk = request.chunk.into_owned();
    debug!(chunk = chunk.index, rows = chunk.row_count(), "worker received chunk");

    let result = compute_chunk(&chunk, engine);
    let index = result.index;

    serde_json::to_writer(&mut writer, &WorkerResponse { result })?;
    writer.flush()?;
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::SmilesEngine;
    use crate::model::table::MoleculeTable;

    fn chunk() -> Chunk {
        Chunk {
            index: 2,
            structure_column: 0,
            name_column: 1,
            table: MoleculeTable::from_text_rows(
                ["SMILES", "Molecule name"],
                [["CCO", "ethanol"], ["C1CC", "broken"]],
            ),
        }
    }

    #[test]
    fn serve_answers_one_request() {
        let chunk = chunk();
        let request = serde_json::to_vec(&WorkerRequest::borrowed(&chunk)).unwrap();

        let mut out = Vec::new();
        let index = serve(request.as_slice(), &mut out, &SmilesEngine).unwrap();
        assert_eq!(index, 2);

        let response: WorkerResponse = serde_json::from_slice(&out).unwrap();
        assert_eq!(response.result, compute_chunk(&chunk, &SmilesEngine));
        assert_eq!(response.result.failures[0].molecule, "broken");
    }

    #[test]
    fn serve_rejects_malformed_request() {
        let mut out = Vec::new();
        let err = serve("{\"chunk\": 3}".as_bytes(), &mut out, &SmilesEngine).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(out.is_empty());
    }
}
