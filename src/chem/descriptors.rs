//! Descriptor estimators over a parsed [`Molecule`].
//!
//! TPSA follows the Ertl fragment table for nitrogen and oxygen (sulfur and
//! phosphorus contribute nothing). logP uses a reduced Wildman–Crippen atom
//! typing: every heavy atom and every attached hydrogen gets one contribution.

use super::element::Element;
use super::molecule::{BondOrder, Molecule};
use crate::model::descriptors::DescriptorSet;

const HYDROGEN_MASS: f64 = 1.008;

/// Computes the full descriptor set for one molecule.
pub fn compute(mol: &Molecule) -> DescriptorSet {
    DescriptorSet::new(
        molecular_weight(mol),
        tpsa(mol),
        logp(mol),
        h_acceptors(mol),
        h_donors(mol),
        mol.ring_count() as u32,
    )
}

/// Average molecular weight, including folded (implicit and bracket) hydrogens.
pub fn molecular_weight(mol: &Molecule) -> f64 {
    mol.atoms
        .iter()
        .map(|a| a.element.atomic_mass() + a.hydrogens as f64 * HYDROGEN_MASS)
        .sum()
}

/// Nitrogen and oxygen atoms, excluding cations and pyrrole-type `[nH]`.
pub fn h_acceptors(mol: &Molecule) -> u32 {
    (0..mol.atom_count())
        .filter(|&i| {
            let atom = &mol.atoms[i];
            if !atom.element.is_n_or_o() || atom.charge > 0 {
                return false;
            }
            !(atom.element == Element::N && atom.aromatic && mol.total_hydrogens(i) > 0)
        })
        .count() as u32
}

/// Nitrogen and oxygen atoms carrying at least one hydrogen.
pub fn h_donors(mol: &Molecule) -> u32 {
    (0..mol.atom_count())
        .filter(|&i| mol.atoms[i].element.is_n_or_o() && mol.total_hydrogens(i) > 0)
        .count() as u32
}

/// Heavy-neighbor bond counts by order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct BondProfile {
    single: u8,
    double: u8,
    triple: u8,
    aromatic: u8,
}

impl BondProfile {
    fn of(mol: &Molecule, atom: usize) -> Self {
        let mut profile = Self::default();
        for (nb, bond) in mol.bonds_of(atom) {
            if mol.atoms[nb].element.is_hydrogen() {
                continue;
            }
            match bond.order {
                BondOrder::Single => profile.single += 1,
                BondOrder::Double => profile.double += 1,
                BondOrder::Triple => profile.triple += 1,
                BondOrder::Aromatic => profile.aromatic += 1,
            }
        }
        profile
    }

    fn heavy(&self) -> u32 {
        (self.single + self.double + self.triple + self.aromatic) as u32
    }

    fn shape(&self) -> (u8, u8, u8, u8) {
        (self.single, self.double, self.triple, self.aromatic)
    }
}

/// Topological polar surface area in square angstroms.
pub fn tpsa(mol: &Molecule) -> f64 {
    (0..mol.atom_count())
        .map(|i| match mol.atoms[i].element {
            Element::N => nitrogen_psa(mol, i),
            Element::O => oxygen_psa(mol, i),
            _ => 0.0,
        })
        .sum()
}

fn nitrogen_psa(mol: &Molecule, i: usize) -> f64 {
    let atom = &mol.atoms[i];
    let h = mol.total_hydrogens(i);
    let p = BondProfile::of(mol, i);

    let known = match (atom.aromatic, atom.charge, h, p.shape()) {
        (false, 0, 0, (3, 0, 0, 0)) => Some(3.24),
        (false, 0, 0, (1, 1, 0, 0)) => Some(12.36),
        (false, 0, 0, (0, 0, 1, 0)) => Some(23.79),
        (false, 0, 0, (1, 2, 0, 0)) => Some(11.68),
        (false, 0, 0, (0, 2, 0, 0)) => Some(13.60),
        (false, 0, 1, (2, 0, 0, 0)) => Some(12.03),
        (false, 0, 1, (0, 1, 0, 0)) => Some(23.85),
        (false, 0, 2, (1, 0, 0, 0)) => Some(26.02),
        (false, 1, 0, (4, 0, 0, 0)) => Some(0.0),
        (false, 1, 0, (2, 1, 0, 0)) => Some(3.01),
        (false, 1, 0, (1, 0, 1, 0)) => Some(4.36),
        (false, 1, 0, (0, 2, 0, 0)) => Some(13.97),
        (false, 1, 1, (3, 0, 0, 0)) => Some(4.44),
        (false, 1, 1, (1, 1, 0, 0)) => Some(13.97),
        (false, 1, 2, (2, 0, 0, 0)) => Some(16.61),
        (false, 1, 2, (0, 1, 0, 0)) => Some(25.59),
        (false, 1, 3, (1, 0, 0, 0)) => Some(27.64),
        (true, 0, 0, (0, 0, 0, 2)) => Some(12.89),
        (true, 0, 0, (0, 0, 0, 3)) => Some(4.41),
        (true, 0, 0, (1, 0, 0, 2)) => Some(4.93),
        (true, 0, 0, (0, 1, 0, 2)) => Some(8.39),
        (true, 0, 1, (0, 0, 0, 2)) => Some(15.79),
        (true, 1, 0, (0, 0, 0, 3)) => Some(4.10),
        (true, 1, 0, (1, 0, 0, 2)) => Some(3.88),
        (true, 1, 1, (0, 0, 0, 2)) => Some(14.14),
        _ => None,
    };

    known.unwrap_or_else(|| (30.5 - 8.2 * p.heavy() as f64 + 1.5 * h as f64).max(0.0))
}

fn oxygen_psa(mol: &Molecule, i: usize) -> f64 {
    let atom = &mol.atoms[i];
    let h = mol.total_hydrogens(i);
    let p = BondProfile::of(mol, i);

    let known = match (atom.aromatic, atom.charge, h, p.shape()) {
        (false, 0, 0, (2, 0, 0, 0)) => Some(9.23),
        (false, 0, 0, (0, 1, 0, 0)) => Some(17.07),
        (false, 0, 1, (1, 0, 0, 0)) => Some(20.23),
        (false, -1, 0, (1, 0, 0, 0)) => Some(23.06),
        (true, 0, 0, (0, 0, 0, 2)) => Some(13.14),
        _ => None,
    };

    known.unwrap_or_else(|| (28.5 - 8.6 * p.heavy() as f64 + 1.5 * h as f64).max(0.0))
}

/// Octanol/water partition coefficient estimate.
pub fn logp(mol: &Molecule) -> f64 {
    (0..mol.atom_count())
        .filter(|&i| !mol.atoms[i].element.is_hydrogen())
        .map(|i| heavy_atom_logp(mol, i) + mol.total_hydrogens(i) as f64 * hydrogen_logp(mol, i))
        .sum()
}

fn is_hetero(element: Element) -> bool {
    element != Element::C && !element.is_hydrogen()
}

fn heavy_atom_logp(mol: &Molecule, i: usize) -> f64 {
    let atom = &mol.atoms[i];
    let h = mol.total_hydrogens(i);

    match atom.element {
        Element::C => carbon_logp(mol, i, h),
        Element::N => {
            if atom.aromatic {
                -0.4806
            } else if atom.charge > 0 {
                -0.3239
            } else if mol.has_bond_order(i, BondOrder::Double)
                || mol.has_bond_order(i, BondOrder::Triple)
            {
                -0.3187
            } else {
                match h {
                    0 => -0.3187,
                    1 => -0.7096,
                    _ => -1.0190,
                }
            }
        }
        Element::O => {
            if atom.aromatic {
                0.1552
            } else if atom.charge < 0 {
                -1.3260
            } else if mol.has_bond_order(i, BondOrder::Double) {
                -0.1526
            } else if h > 0 {
                -0.2893
            } else {
                -0.0684
            }
        }
        Element::S if atom.aromatic => 0.6237,
        Element::S => 0.6482,
        Element::P => 0.8612,
        Element::F => 0.4202,
        Element::CL => 0.6895,
        Element::BR => 0.8456,
        Element::I => 0.8857,
        _ => 0.0,
    }
}

fn carbon_logp(mol: &Molecule, i: usize, h: u32) -> f64 {
    let hetero_neighbor = mol
        .bonds_of(i)
        .any(|(nb, _)| is_hetero(mol.atoms[nb].element));

    if mol.atoms[i].aromatic {
        if h > 0 {
            return 0.1581;
        }
        let profile = BondProfile::of(mol, i);
        if profile.aromatic >= 3 {
            return 0.2955;
        }
        return if hetero_neighbor { 0.1360 } else { 0.2713 };
    }

    let double_to_hetero = mol
        .bonds_of(i)
        .any(|(nb, b)| b.order == BondOrder::Double && is_hetero(mol.atoms[nb].element));
    if double_to_hetero {
        return -0.2783;
    }
    if mol.has_bond_order(i, BondOrder::Double) || mol.has_bond_order(i, BondOrder::Triple) {
        return 0.1551;
    }

    match (hetero_neighbor, h >= 2) {
        (true, true) => -0.2035,
        (true, false) => -0.2051,
        (false, true) => 0.1441,
        (false, false) => 0.0,
    }
}

fn hydrogen_logp(mol: &Molecule, i: usize) -> f64 {
    match mol.atoms[i].element {
        Element::N => 0.2142,
        Element::O if is_acid_oxygen(mol, i) => 0.2980,
        Element::O => -0.2677,
        _ => 0.1230,
    }
}

/// Hydroxyl oxygen on a carbon that also carries `=O`.
fn is_acid_oxygen(mol: &Molecule, i: usize) -> bool {
    mol.bonds_of(i).any(|(c, _)| {
        mol.atoms[c].element == Element::C
            && mol.bonds_of(c).any(|(o, b)| {
                o != i && b.order == BondOrder::Double && mol.atoms[o].element == Element::O
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::smiles::parse_smiles;

    const ASPIRIN: &str = "CC(=O)Oc1ccccc1C(=O)O";

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn mol(smiles: &str) -> Molecule {
        parse_smiles(smiles).unwrap()
    }

    #[test]
    fn molecular_weight_includes_implicit_hydrogens() {
        assert!(approx_eq(molecular_weight(&mol("C")), 16.043, 1e-3));
        assert!(approx_eq(molecular_weight(&mol(ASPIRIN)), 180.159, 1e-3));
    }

    #[test]
    fn molecular_weight_counts_explicit_hydrogen_atoms_once() {
        let explicit = molecular_weight(&mol("[H]O[H]"));
        let implicit = molecular_weight(&mol("O"));
        assert!(approx_eq(explicit, implicit, 1e-9));
    }

    #[test]
    fn tpsa_matches_reference_values() {
        assert!(approx_eq(tpsa(&mol(ASPIRIN)), 63.6, 1e-6));
        assert!(approx_eq(tpsa(&mol("CCO")), 20.23, 1e-6));
        assert!(approx_eq(tpsa(&mol("c1ccncc1")), 12.89, 1e-6));
        assert!(approx_eq(tpsa(&mol("c1cc[nH]c1")), 15.79, 1e-6));
        assert!(approx_eq(tpsa(&mol("CC#N")), 23.79, 1e-6));
    }

    #[test]
    fn tpsa_is_zero_for_hydrocarbons_and_sulfur() {
        assert_eq!(tpsa(&mol("c1ccccc1")), 0.0);
        assert_eq!(tpsa(&mol("CSC")), 0.0);
    }

    #[test]
    fn logp_for_simple_molecules() {
        assert!(approx_eq(logp(&mol("c1ccccc1")), 1.6866, 1e-4));
        assert!(approx_eq(logp(&mol("CCO")), -0.0014, 1e-4));
        assert!(logp(&mol("CCCCCCCC")) > 2.5);
        assert!(logp(&mol("OCC(O)CO")) < 0.0);
    }

    #[test]
    fn acid_hydroxyl_uses_acid_hydrogen_contribution() {
        let acid = mol("CC(=O)O");
        assert!(is_acid_oxygen(&acid, 3));
        assert!(!is_acid_oxygen(&acid, 2));
        assert!(!is_acid_oxygen(&mol("CCO"), 2));
    }

    #[test]
    fn hydrogen_bond_counts() {
        let aspirin = mol(ASPIRIN);
        assert_eq!(h_acceptors(&aspirin), 4);
        assert_eq!(h_donors(&aspirin), 1);

        let pyrrole = mol("c1cc[nH]c1");
        assert_eq!(h_acceptors(&pyrrole), 0);
        assert_eq!(h_donors(&pyrrole), 1);

        let ammonium = mol("C[NH3+]");
        assert_eq!(h_acceptors(&ammonium), 0);
        assert_eq!(h_donors(&ammonium), 1);
    }

    #[test]
    fn compute_assembles_descriptor_set() {
        let set = compute(&mol(ASPIRIN));
        assert_eq!(set.ring_count, 1);
        assert_eq!(set.h_donors, 1);
        assert!(set.lipinski_pass);

        let naphthalene = compute(&mol("c1ccc2ccccc2c1"));
        assert_eq!(naphthalene.ring_count, 2);
    }
}
