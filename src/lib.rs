//! Chunked, parallel computation of molecular descriptors for tabular
//! SMILES libraries.
//!
//! A library is a table with one structure (SMILES) column, one unique
//! molecule-name column and any number of metadata columns. The pipeline
//! deduplicates it by name, splits it into a bounded number of contiguous
//! chunks, computes every chunk in an isolated worker, and reassembles the
//! results in input order with seven descriptor columns appended:
//! molecular weight, TPSA, logP, H-bond acceptors and donors, ring count,
//! and the Lipinski rule-of-five verdict.
//!
//! # Quick Start
//!
//! ```
//! use molprops::{MoleculeTable, Pipeline, PipelineConfig, SmilesEngine, ThreadDispatcher};
//! use molprops::Value;
//!
//! let table = MoleculeTable::from_text_rows(
//!     ["SMILES", "Molecule name", "Vendor"],
//!     [
//!         ["CCO", "ethanol", "acme"],
//!         ["CC(=O)Oc1ccccc1C(=O)O", "aspirin", "acme"],
//!         ["CCO", "ethanol", "other"],
//!     ],
//! );
//!
//! let pipeline = Pipeline::new(PipelineConfig::default(), ThreadDispatcher::new(SmilesEngine));
//! let output = pipeline.run(table)?;
//!
//! assert_eq!(output.report.duplicates_dropped, 1);
//! assert_eq!(output.table.row_count(), 2);
//! assert_eq!(output.table.value("aspirin", "H Donors"), Some(&Value::Int(1)));
//! assert_eq!(output.table.value("aspirin", "Lipinski pass"), Some(&Value::Bool(true)));
//! # Ok::<(), molprops::PipelineError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`pipeline`]: Column resolution, deduplication, partitioning, dispatch, aggregation
//! - [`chem`]: The [`ChemistryEngine`] capability and the built-in [`SmilesEngine`]
//! - [`io`]: CSV input, CSV/JSON output, atomic file replacement
//!
//! # Data Types
//!
//! - [`MoleculeTable`]: Raw or prepared input rows
//! - [`Chunk`]: A self-describing partition of a prepared table
//! - [`DescriptorSet`]: Descriptors for one molecule
//! - [`EnrichedTable`]: Output rows keyed by molecule name
//! - [`Value`]: A single table cell

mod model;

pub mod chem;
pub mod io;
pub mod pipeline;

pub use model::descriptors::{DESCRIPTOR_COLUMNS, DescriptorSet, lipinski_pass};
pub use model::enriched::{EnrichedRow, EnrichedTable};
pub use model::table::{Chunk, MoleculeTable, Row};
pub use model::value::Value;

pub use chem::{ChemistryEngine, MoleculeParseError, SmilesEngine};

pub use pipeline::{
    ChunkResult, Dispatcher, Isolation, Pipeline, PipelineConfig, PipelineOutput,
    ProcessDispatcher, RunReport, ThreadDispatcher,
};

pub use io::error::Error as IoError;
pub use pipeline::Error as PipelineError;
