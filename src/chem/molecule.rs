use super::element::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    pub fn value(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub charge: i8,
    pub aromatic: bool,
    /// Hydrogens folded into this atom (implicit, or the `H` count of a bracket atom).
    pub hydrogens: u8,
    /// Written in brackets; bracket atoms never receive implicit hydrogens.
    pub bracket: bool,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            charge: 0,
            aromatic: false,
            hydrogens: 0,
            bracket: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order }
        } else {
            Self { i: idx2, j: idx1, order }
        }
    }

    pub fn other(&self, atom: usize) -> usize {
        if self.i == atom { self.j } else { self.i }
    }
}

/// A molecular graph: atoms, bonds and a per-atom adjacency list of bond indices.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    adjacency: Vec<Vec<usize>>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.i].push(idx);
            adjacency[bond.j].push(idx);
        }
        Self {
            atoms,
            bonds,
            adjacency,
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms
            .iter()
            .filter(|a| !a.element.is_hydrogen())
            .count()
    }

    /// Bonds incident to `atom`, with the neighbor index.
    pub fn bonds_of(&self, atom: usize) -> impl Iterator<Item = (usize, &Bond)> + '_ {
        self.adjacency[atom].iter().map(move |&b| {
            let bond = &self.bonds[b];
            (bond.other(atom), bond)
        })
    }

    #[inline]
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Hydrogens on `atom`, counting both folded hydrogens and explicit `[H]` neighbors.
    pub fn total_hydrogens(&self, atom: usize) -> u32 {
        let explicit = self
            .bonds_of(atom)
            .filter(|(n, _)| self.atoms[*n].element.is_hydrogen())
            .count() as u32;
        self.atoms[atom].hydrogens as u32 + explicit
    }

    /// Heavy-atom neighbors of `atom`.
    pub fn heavy_degree(&self, atom: usize) -> usize {
        self.bonds_of(atom)
            .filter(|(n, _)| !self.atoms[*n].element.is_hydrogen())
            .count()
    }

    pub fn has_bond_order(&self, atom: usize, order: BondOrder) -> bool {
        self.bonds_of(atom).any(|(_, b)| b.order == order)
    }

    /// Number of connected components (disconnected fragments count separately).
    pub fn component_count(&self) -> usize {
        let n = self.atoms.len();
        let mut seen = vec![false; n];
        let mut components = 0;
        let mut stack = Vec::new();

        for start in 0..n {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            stack.push(start);
            while let Some(a) = stack.pop() {
                for (nb, _) in self.bonds_of(a) {
                    if !seen[nb] {
                        seen[nb] = true;
                        stack.push(nb);
                    }
                }
            }
        }

        components
    }

    /// Smallest-set-of-smallest-rings size, via the cyclomatic number
    /// `bonds - atoms + components`.
    pub fn ring_count(&self) -> usize {
        (self.bond_count() + self.component_count()).saturating_sub(self.atom_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_of(n: usize) -> Molecule {
        let atoms = (0..n).map(|_| Atom::new(Element::C)).collect();
        let bonds = (0..n)
            .map(|i| Bond::new(i, (i + 1) % n, BondOrder::Single))
            .collect();
        Molecule::new(atoms, bonds)
    }

    #[test]
    fn bond_new_orders_indices() {
        let b = Bond::new(3, 1, BondOrder::Double);
        assert_eq!((b.i, b.j), (1, 3));
        assert_eq!(b.other(1), 3);
        assert_eq!(b.other(3), 1);
    }

    #[test]
    fn adjacency_and_degree() {
        let mol = ring_of(6);
        assert_eq!(mol.degree(0), 2);
        let mut neighbors: Vec<_> = mol.bonds_of(0).map(|(n, _)| n).collect();
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![1, 5]);
    }

    #[test]
    fn ring_count_from_cyclomatic_number() {
        assert_eq!(ring_of(6).ring_count(), 1);

        let chain = Molecule::new(
            vec![Atom::new(Element::C), Atom::new(Element::O)],
            vec![Bond::new(0, 1, BondOrder::Single)],
        );
        assert_eq!(chain.ring_count(), 0);
    }

    #[test]
    fn components_count_disconnected_fragments() {
        let mol = Molecule::new(
            vec![Atom::new(Element::C), Atom::new(Element::C), Atom::new(Element::O)],
            vec![Bond::new(0, 1, BondOrder::Single)],
        );
        assert_eq!(mol.component_count(), 2);
        assert_eq!(mol.ring_count(), 0);
    }

    #[test]
    fn explicit_hydrogen_neighbors_count_toward_total() {
        let mut o = Atom::new(Element::O);
        o.hydrogens = 1;
        let mol = Molecule::new(
            vec![o, Atom::new(Element::H)],
            vec![Bond::new(0, 1, BondOrder::Single)],
        );
        assert_eq!(mol.total_hydrogens(0), 2);
        assert_eq!(mol.heavy_degree(0), 0);
        assert_eq!(mol.heavy_atom_count(), 1);
    }
}
