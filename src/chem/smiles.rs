use std::collections::BTreeMap;
use std::str::FromStr;

use super::element::Element;
use super::error::MoleculeParseError;
use super::molecule::{Atom, Bond, BondOrder, Molecule};

/// Parses a SMILES string into a molecular graph.
///
/// Anything after the first whitespace is ignored, so `"CCO ethanol"` parses
/// as ethanol. Supports the organic subset, bracket atoms (isotope, chirality
/// and atom class are accepted and discarded), branches, ring closures
/// (including `%nn`), explicit bond symbols and `.`-separated fragments.
pub fn parse_smiles(smiles: &str) -> Result<Molecule, MoleculeParseError> {
    let text = smiles.split_whitespace().next().unwrap_or("");
    if text.is_empty() {
        return Err(MoleculeParseError::new(smiles, 0, "empty structure"));
    }

    let mut parser = Parser::new(text);
    parser.run()?;
    parser.finish()
}

struct OpenRing {
    atom: usize,
    order: Option<BondOrder>,
    position: usize,
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    open_rings: BTreeMap<u16, OpenRing>,
    branches: Vec<usize>,
    prev: Option<usize>,
    pending: Option<BondOrder>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            open_rings: BTreeMap::new(),
            branches: Vec::new(),
            prev: None,
            pending: None,
        }
    }

    fn error(&self, detail: impl Into<String>) -> MoleculeParseError {
        MoleculeParseError::new(self.text, self.pos, detail)
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn run(&mut self) -> Result<(), MoleculeParseError> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    let prev = self
                        .prev
                        .ok_or_else(|| self.error("branch opened without a preceding atom"))?;
                    self.branches.push(prev);
                    self.pos += 1;
                }
                b')' => {
                    if self.pending.is_some() {
                        return Err(self.error("bond symbol before ')' has no target atom"));
                    }
                    let resume = self
                        .branches
                        .pop()
                        .ok_or_else(|| self.error("unbalanced ')'"))?;
                    self.prev = Some(resume);
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b':' | b'/' | b'\\' => {
                    if self.prev.is_none() {
                        return Err(self.error("bond symbol without a preceding atom"));
                    }
                    if self.pending.is_some() {
                        return Err(self.error("consecutive bond symbols"));
                    }
                    self.pending = Some(match ch {
                        b'=' => BondOrder::Double,
                        b'#' => BondOrder::Triple,
                        b':' => BondOrder::Aromatic,
                        _ => BondOrder::Single,
                    });
                    self.pos += 1;
                }
                b'.' => {
                    if self.pending.is_some() {
                        return Err(self.error("bond symbol before '.' has no target atom"));
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                b'%' => {
                    let start = self.pos;
                    let digits = (self.peek_at(1), self.peek_at(2));
                    let ring = match digits {
                        (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                            (a - b'0') as u16 * 10 + (b - b'0') as u16
                        }
                        _ => return Err(self.error("'%' must be followed by two digits")),
                    };
                    self.pos += 3;
                    self.ring_closure(ring, start)?;
                }
                b'0'..=b'9' => {
                    let start = self.pos;
                    self.pos += 1;
                    self.ring_closure((ch - b'0') as u16, start)?;
                }
                b'[' => self.bracket_atom()?,
                _ if is_organic_start(ch) => self.organic_atom()?,
                _ => {
                    return Err(self.error(format!("unexpected character '{}'", ch as char)));
                }
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<(), MoleculeParseError> {
        let ch = self.bytes[self.pos];
        let aromatic = ch.is_ascii_lowercase();
        let next = self.peek_at(1);

        let (element, width) = match ch {
            b'B' if next == Some(b'r') => (Element::BR, 2),
            b'C' if next == Some(b'l') => (Element::CL, 2),
            b'B' | b'b' => (Element::B, 1),
            b'C' | b'c' => (Element::C, 1),
            b'N' | b'n' => (Element::N, 1),
            b'O' | b'o' => (Element::O, 1),
            b'P' | b'p' => (Element::P, 1),
            b'S' | b's' => (Element::S, 1),
            b'F' => (Element::F, 1),
            b'I' => (Element::I, 1),
            _ => return Err(self.error(format!("unknown organic atom '{}'", ch as char))),
        };

        let mut atom = Atom::new(element);
        atom.aromatic = aromatic;
        self.pos += width;
        self.push_atom(atom);
        Ok(())
    }

    fn bracket_atom(&mut self) -> Result<(), MoleculeParseError> {
        self.pos += 1;
        self.skip_digits();

        let (element, aromatic) = self.bracket_symbol()?;

        while self.peek() == Some(b'@') {
            self.pos += 1;
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.pos += 1;
            hydrogens = match self.read_digits() {
                Some(n) => u8::try_from(n)
                    .map_err(|_| self.error("hydrogen count out of range"))?,
                None => 1,
            };
        }

        let mut charge = 0i8;
        if let Some(sign @ (b'+' | b'-')) = self.peek() {
            let unit: i8 = if sign == b'+' { 1 } else { -1 };
            self.pos += 1;
            charge = match self.read_digits() {
                Some(n) => i8::try_from(n)
                    .ok()
                    .and_then(|n| n.checked_mul(unit))
                    .ok_or_else(|| self.error("charge out of range"))?,
                None => {
                    let mut c = unit;
                    while self.peek() == Some(sign) {
                        self.pos += 1;
                        c = c
                            .checked_add(unit)
                            .ok_or_else(|| self.error("charge out of range"))?;
                    }
                    c
                }
            };
        }

        if self.peek() == Some(b':') {
            self.pos += 1;
            self.skip_digits();
        }

        if self.peek() != Some(b']') {
            return Err(self.error("expected ']' to close bracket atom"));
        }
        self.pos += 1;

        self.push_atom(Atom {
            element,
            charge,
            aromatic,
            hydrogens,
            bracket: true,
        });
        Ok(())
    }

    fn bracket_symbol(&mut self) -> Result<(Element, bool), MoleculeParseError> {
        let first = self
            .peek()
            .ok_or_else(|| self.error("unexpected end inside bracket atom"))?;
        let second = self.peek_at(1);

        if first.is_ascii_lowercase() {
            let two = second.map(|s| [first.to_ascii_uppercase(), s]);
            if let Some(pair @ ([b'S', b'e'] | [b'A', b's'])) = two {
                self.pos += 2;
                let symbol = std::str::from_utf8(&pair).unwrap_or_default();
                let element = Element::from_str(symbol).map_err(|e| self.error(e.to_string()))?;
                return Ok((element, true));
            }
            let element = match first {
                b'b' => Element::B,
                b'c' => Element::C,
                b'n' => Element::N,
                b'o' => Element::O,
                b'p' => Element::P,
                b's' => Element::S,
                _ => {
                    return Err(
                        self.error(format!("'{}' cannot be aromatic", first as char))
                    );
                }
            };
            self.pos += 1;
            return Ok((element, true));
        }

        if !first.is_ascii_uppercase() {
            return Err(self.error(format!(
                "expected element symbol, found '{}'",
                first as char
            )));
        }

        if let Some(s) = second.filter(u8::is_ascii_lowercase) {
            let pair = [first, s];
            let symbol = std::str::from_utf8(&pair).unwrap_or_default();
            if let Ok(element) = Element::from_str(symbol) {
                self.pos += 2;
                return Ok((element, false));
            }
        }

        let single = [first];
        let symbol = std::str::from_utf8(&single).unwrap_or_default();
        let element = Element::from_str(symbol).map_err(|e| self.error(e.to_string()))?;
        self.pos += 1;
        Ok((element, false))
    }

    fn read_digits(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut n: u32 = 0;
        while let Some(d) = self.peek().filter(u8::is_ascii_digit) {
            n = n.saturating_mul(10).saturating_add((d - b'0') as u32);
            self.pos += 1;
        }
        (self.pos > start).then_some(n)
    }

    fn skip_digits(&mut self) {
        let _ = self.read_digits();
    }

    fn push_atom(&mut self, atom: Atom) {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        if let Some(prev) = self.prev {
            let order = self
                .pending
                .take()
                .unwrap_or_else(|| self.implied_order(prev, idx));
            self.bonds.push(Bond::new(prev, idx, order));
        }
        self.pending = None;
        self.prev = Some(idx);
    }

    fn implied_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].aromatic && self.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn ring_closure(&mut self, ring: u16, position: usize) -> Result<(), MoleculeParseError> {
        let current = self
            .prev
            .ok_or_else(|| self.error("ring closure without a preceding atom"))?;
        let pending = self.pending.take();

        let Some(open) = self.open_rings.remove(&ring) else {
            self.open_rings.insert(
                ring,
                OpenRing {
                    atom: current,
                    order: pending,
                    position,
                },
            );
            return Ok(());
        };

        if open.atom == current {
            return Err(self.error(format!("ring bond {ring} closes on its own atom")));
        }
        if self
            .bonds
            .iter()
            .any(|b| *b == Bond::new(open.atom, current, b.order))
        {
            return Err(self.error(format!("ring bond {ring} duplicates an existing bond")));
        }

        let order = match (open.order, pending) {
            (Some(a), Some(b)) if a != b => {
                return Err(self.error(format!("conflicting bond orders on ring bond {ring}")));
            }
            (Some(a), _) | (None, Some(a)) => a,
            (None, None) => self.implied_order(open.atom, current),
        };
        self.bonds.push(Bond::new(open.atom, current, order));
        Ok(())
    }

    fn finish(mut self) -> Result<Molecule, MoleculeParseError> {
        if let Some((ring, open)) = self.open_rings.iter().next() {
            return Err(MoleculeParseError::new(
                self.text,
                open.position,
                format!("ring bond {ring} is never closed"),
            ));
        }
        if !self.branches.is_empty() {
            return Err(self.error(format!("{} unclosed '('", self.branches.len())));
        }
        if self.pending.is_some() {
            return Err(self.error("trailing bond symbol"));
        }

        self.assign_implicit_hydrogens();
        Ok(Molecule::new(self.atoms, self.bonds))
    }

    /// Fills hydrogens for unbracketed atoms up to their lowest fitting valence.
    ///
    /// Aromatic atoms reserve one valence for the pi system and only use their
    /// lowest valence, so pyridine `n`, furan `o` and thiophene `s` carry no H.
    fn assign_implicit_hydrogens(&mut self) {
        let mut used = vec![0u32; self.atoms.len()];
        for bond in &self.bonds {
            let weight = match bond.order {
                BondOrder::Single | BondOrder::Aromatic => 1,
                BondOrder::Double => 2,
                BondOrder::Triple => 3,
            };
            used[bond.i] += weight;
            used[bond.j] += weight;
        }

        for (atom, used) in self.atoms.iter_mut().zip(used) {
            if atom.bracket {
                continue;
            }
            let valences = atom.element.default_valences();
            let hydrogens = if atom.aromatic {
                valences
                    .first()
                    .map(|&v| (v as u32).saturating_sub(used + 1))
                    .unwrap_or(0)
            } else {
                valences
                    .iter()
                    .map(|&v| v as u32)
                    .find(|&v| v >= used)
                    .map(|v| v - used)
                    .unwrap_or(0)
            };
            atom.hydrogens = hydrogens as u8;
        }
    }
}

fn is_organic_start(ch: u8) -> bool {
    matches!(
        ch,
        b'B' | b'C'
            | b'N'
            | b'O'
            | b'P'
            | b'S'
            | b'F'
            | b'I'
            | b'b'
            | b'c'
            | b'n'
            | b'o'
            | b'p'
            | b's'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hydrogens(smiles: &str) -> Vec<u8> {
        parse_smiles(smiles)
            .unwrap()
            .atoms
            .iter()
            .map(|a| a.hydrogens)
            .collect()
    }

    #[test]
    fn parses_methane() {
        let mol = parse_smiles("C").unwrap();
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(mol.atoms[0].hydrogens, 4);
    }

    #[test]
    fn fills_implicit_hydrogens_for_chains() {
        assert_eq!(hydrogens("CCO"), vec![3, 2, 1]);
        assert_eq!(hydrogens("C=C"), vec![2, 2]);
        assert_eq!(hydrogens("C#N"), vec![1, 0]);
        assert_eq!(hydrogens("CC(=O)O"), vec![3, 0, 0, 1]);
    }

    #[test]
    fn uses_higher_valences_when_needed() {
        assert_eq!(hydrogens("CS(=O)(=O)C"), vec![3, 0, 0, 0, 3]);
        assert_eq!(hydrogens("CP(=O)(O)O"), vec![3, 0, 0, 1, 1]);
    }

    #[test]
    fn parses_aromatic_rings() {
        let benzene = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(benzene.bond_count(), 6);
        assert!(benzene.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert!(benzene.atoms.iter().all(|a| a.aromatic && a.hydrogens == 1));

        assert_eq!(hydrogens("c1ccncc1"), vec![1, 1, 1, 0, 1, 1]);
        assert_eq!(hydrogens("c1ccoc1"), vec![1, 1, 1, 0, 1]);
        assert_eq!(hydrogens("c1ccsc1"), vec![1, 1, 1, 0, 1]);
    }

    #[test]
    fn parses_bracket_atoms() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(mol.atoms[0].element, Element::N);
        assert_eq!(mol.atoms[0].charge, 1);
        assert_eq!(mol.atoms[0].hydrogens, 4);

        let pyrrole = parse_smiles("c1cc[nH]c1").unwrap();
        assert!(pyrrole.atoms[3].aromatic);
        assert_eq!(pyrrole.atoms[3].hydrogens, 1);

        let mol = parse_smiles("[13CH3][C@@H](O)[O-]").unwrap();
        assert_eq!(mol.atoms[0].hydrogens, 3);
        assert_eq!(mol.atoms[1].hydrogens, 1);
        assert_eq!(mol.atoms[2].hydrogens, 1);
        assert_eq!(mol.atoms[3].charge, -1);
        assert_eq!(mol.atoms[3].hydrogens, 0);
    }

    #[test]
    fn parses_multi_charge_and_two_letter_symbols() {
        let mol = parse_smiles("[Fe+++].[Cl-].[Cl-].[Cl-]").unwrap();
        assert_eq!(mol.atoms[0].element.symbol(), "Fe");
        assert_eq!(mol.atoms[0].charge, 3);
        assert_eq!(mol.component_count(), 4);

        let mol = parse_smiles("[Ca+2]").unwrap();
        assert_eq!(mol.atoms[0].charge, 2);

        let mol = parse_smiles("c1cc[se]c1").unwrap();
        assert_eq!(mol.atoms[3].element, Element::SE);
        assert!(mol.atoms[3].aromatic);
    }

    #[test]
    fn oversized_charges_and_hydrogen_counts_are_errors() {
        for smiles in ["[C-128]", "[N+200]", "[CH300]", "[N+99999999999]"] {
            let err = parse_smiles(smiles).unwrap_err();
            assert!(err.to_string().contains("out of range"), "{smiles}: {err}");
        }

        let repeated = format!("[N{}]", "+".repeat(200));
        let err = parse_smiles(&repeated).unwrap_err();
        assert!(err.to_string().contains("charge out of range"));

        assert_eq!(parse_smiles("[C-127]").unwrap().atoms[0].charge, -127);
        assert_eq!(parse_smiles("[CH255]").unwrap().atoms[0].hydrogens, 255);
    }

    #[test]
    fn parses_branches_and_two_digit_rings() {
        let mol = parse_smiles("CC(C)(C)C").unwrap();
        assert_eq!(mol.degree(1), 4);
        assert_eq!(mol.atoms[1].hydrogens, 0);

        let mol = parse_smiles("C%10CCCCCCCCC%10").unwrap();
        assert_eq!(mol.atom_count(), 10);
        assert_eq!(mol.bond_count(), 10);
        assert_eq!(mol.ring_count(), 1);
    }

    #[test]
    fn ring_bond_order_may_be_written_at_either_end() {
        let mol = parse_smiles("C=1CCCCC1").unwrap();
        assert_eq!(mol.bonds.last().unwrap().order, BondOrder::Double);
        let mol = parse_smiles("C1CCCCC=1").unwrap();
        assert_eq!(mol.bonds.last().unwrap().order, BondOrder::Double);
    }

    #[test]
    fn ignores_trailing_title() {
        let mol = parse_smiles("CCO ethanol").unwrap();
        assert_eq!(mol.atom_count(), 3);
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in [
            "", "   ", "C(", "C)", "C1CC", "[", "[Xx]", "C$C", "=C", "CC=", "C==C", "(C)", "C11",
            "[CH4", "*C",
        ] {
            assert!(parse_smiles(bad).is_err(), "expected '{bad}' to fail");
        }
    }

    #[test]
    fn error_reports_position() {
        let err = parse_smiles("CC$C").unwrap_err();
        assert_eq!(err.position, 2);
        assert_eq!(err.input, "CC$C");
        assert!(err.to_string().contains("unexpected character '$'"));
    }

    #[test]
    fn unclosed_ring_reports_opening_position() {
        let err = parse_smiles("CC1CC").unwrap_err();
        assert_eq!(err.position, 2);
        assert!(err.detail.contains("never closed"));
    }
}
