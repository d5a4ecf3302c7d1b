use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

/// Symbol and standard atomic weight for elements 1 (H) through 54 (Xe).
const PERIODIC_TABLE: [(&str, f64); 54] = [
    ("H", 1.008),
    ("He", 4.0026),
    ("Li", 6.94),
    ("Be", 9.0122),
    ("B", 10.81),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.18),
    ("Na", 22.99),
    ("Mg", 24.305),
    ("Al", 26.982),
    ("Si", 28.085),
    ("P", 30.974),
    ("S", 32.06),
    ("Cl", 35.45),
    ("Ar", 39.948),
    ("K", 39.098),
    ("Ca", 40.078),
    ("Sc", 44.956),
    ("Ti", 47.867),
    ("V", 50.942),
    ("Cr", 51.996),
    ("Mn", 54.938),
    ("Fe", 55.845),
    ("Co", 58.933),
    ("Ni", 58.693),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("Ga", 69.723),
    ("Ge", 72.63),
    ("As", 74.922),
    ("Se", 78.971),
    ("Br", 79.904),
    ("Kr", 83.798),
    ("Rb", 85.468),
    ("Sr", 87.62),
    ("Y", 88.906),
    ("Zr", 91.224),
    ("Nb", 92.906),
    ("Mo", 95.96),
    ("Tc", 98.0),
    ("Ru", 101.07),
    ("Rh", 102.91),
    ("Pd", 106.42),
    ("Ag", 107.87),
    ("Cd", 112.41),
    ("In", 114.82),
    ("Sn", 118.71),
    ("Sb", 121.76),
    ("Te", 127.6),
    ("I", 126.9),
    ("Xe", 131.29),
];

/// A chemical element, identified by atomic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    pub const H: Element = Element(1);
    pub const B: Element = Element(5);
    pub const C: Element = Element(6);
    pub const N: Element = Element(7);
    pub const O: Element = Element(8);
    pub const F: Element = Element(9);
    pub const SI: Element = Element(14);
    pub const P: Element = Element(15);
    pub const S: Element = Element(16);
    pub const CL: Element = Element(17);
    pub const AS: Element = Element(33);
    pub const SE: Element = Element(34);
    pub const BR: Element = Element(35);
    pub const I: Element = Element(53);

    pub fn from_atomic_number(n: u8) -> Option<Self> {
        (1..=PERIODIC_TABLE.len() as u8)
            .contains(&n)
            .then_some(Element(n))
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.0
    }

    pub fn symbol(&self) -> &'static str {
        PERIODIC_TABLE[(self.0 - 1) as usize].0
    }

    pub fn atomic_mass(&self) -> f64 {
        PERIODIC_TABLE[(self.0 - 1) as usize].1
    }

    /// Allowed neutral valences for the SMILES organic subset, lowest first.
    ///
    /// Atoms written without brackets get implicit hydrogens up to the lowest
    /// valence that accommodates their explicit bonds.
    pub fn default_valences(&self) -> &'static [u8] {
        match *self {
            Element::B => &[3],
            Element::C => &[4],
            Element::N | Element::P => &[3, 5],
            Element::O => &[2],
            Element::S => &[2, 4, 6],
            Element::F | Element::CL | Element::BR | Element::I => &[1],
            _ => &[],
        }
    }

    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        *self == Element::H
    }

    /// Nitrogen or oxygen; the atoms counted by hydrogen-bond descriptors.
    #[inline]
    pub fn is_n_or_o(&self) -> bool {
        *self == Element::N || *self == Element::O
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PERIODIC_TABLE
            .iter()
            .position(|(symbol, _)| *symbol == s)
            .map(|i| Element(i as u8 + 1))
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
