//! Core data structures flowing through the descriptor pipeline.
//!
//! - [`value`]: Heterogeneous cell values.
//! - [`table`]: The raw/prepared [`MoleculeTable`] and its partitions ([`Chunk`]).
//! - [`descriptors`]: The per-molecule [`DescriptorSet`] and the Lipinski rule.
//! - [`enriched`]: The keyed output table ([`EnrichedTable`]).
//!
//! The raw table ([`MoleculeTable`]) and the computed output ([`EnrichedTable`])
//! are separate types so the pipeline transforms one into the other without
//! mutating shared state.
//!
//! [`MoleculeTable`]: table::MoleculeTable
//! [`Chunk`]: table::Chunk
//! [`DescriptorSet`]: descriptors::DescriptorSet
//! [`EnrichedTable`]: enriched::EnrichedTable

pub mod descriptors;
pub mod enriched;
pub mod table;
pub mod value;
