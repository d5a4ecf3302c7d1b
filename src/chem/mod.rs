//! Chemistry capability used by the descriptor pipeline.
//!
//! The pipeline only depends on the [`ChemistryEngine`] trait: turn a
//! structure string into some molecule representation, then derive a
//! [`DescriptorSet`] from it. [`SmilesEngine`] is the built-in implementation,
//! a pure-Rust SMILES parser plus fragment-based descriptor estimators.

mod descriptors;
mod element;
mod error;
mod molecule;
mod smiles;

pub use descriptors::{compute, h_acceptors, h_donors, logp, molecular_weight, tpsa};
pub use element::{Element, ParseElementError};
pub use error::MoleculeParseError;
pub use molecule::{Atom, Bond, BondOrder, Molecule};
pub use smiles::parse_smiles;

use crate::model::descriptors::DescriptorSet;

/// Parses structure strings and computes descriptors from them.
///
/// Implementations must be deterministic and free of side effects; the
/// pipeline may call them from several threads at once.
pub trait ChemistryEngine: Send + Sync {
    type Molecule;

    fn parse(&self, structure: &str) -> Result<Self::Molecule, MoleculeParseError>;

    fn descriptors(&self, molecule: &Self::Molecule) -> DescriptorSet;
}

/// The built-in SMILES engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmilesEngine;

impl ChemistryEngine for SmilesEngine {
    type Molecule = Molecule;

    fn parse(&self, structure: &str) -> Result<Molecule, MoleculeParseError> {
        parse_smiles(structure)
    }

    fn descriptors(&self, molecule: &Molecule) -> DescriptorSet {
        compute(molecule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn smiles_engine_is_thread_safe() {
        assert_send_sync::<SmilesEngine>();
    }

    #[test]
    fn smiles_engine_parses_and_computes() {
        let engine = SmilesEngine;
        let mol = engine.parse("CCO").unwrap();
        let set = engine.descriptors(&mol);
        assert_eq!(set.h_donors, 1);
        assert_eq!(set.h_acceptors, 1);
        assert_eq!(set.ring_count, 0);
        assert!(set.lipinski_pass);
    }

    #[test]
    fn smiles_engine_reports_parse_errors() {
        let err = SmilesEngine.parse("C1CC").unwrap_err();
        assert_eq!(err.input, "C1CC");
    }
}
