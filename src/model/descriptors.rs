use serde::{Deserialize, Serialize};

use super::value::Value;

/// Output column names for the computed descriptors, in emission order.
pub const DESCRIPTOR_COLUMNS: [&str; 7] = [
    "Molecular weight",
    "TPSA",
    "logP",
    "H Acceptors",
    "H Donors",
    "Ring Count",
    "Lipinski pass",
];

/// Lipinski rule-of-five thresholds. All comparisons are strict.
pub const LIPINSKI_MAX_WEIGHT: f64 = 500.0;
pub const LIPINSKI_MAX_LOGP: f64 = 5.0;
pub const LIPINSKI_MAX_DONORS: u32 = 5;
pub const LIPINSKI_MAX_ACCEPTORS: u32 = 10;

/// Descriptors computed for a single molecule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    pub molecular_weight: f64,
    pub tpsa: f64,
    pub logp: f64,
    pub h_acceptors: u32,
    pub h_donors: u32,
    pub ring_count: u32,
    pub lipinski_pass: bool,
}

impl DescriptorSet {
    /// Assembles a descriptor set, deriving the Lipinski flag from the other values.
    pub fn new(
        molecular_weight: f64,
        tpsa: f64,
        logp: f64,
        h_acceptors: u32,
        h_donors: u32,
        ring_count: u32,
    ) -> Self {
        Self {
            molecular_weight,
            tpsa,
            logp,
            h_acceptors,
            h_donors,
            ring_count,
            lipinski_pass: lipinski_pass(molecular_weight, logp, h_donors, h_acceptors),
        }
    }

    /// Values in [`DESCRIPTOR_COLUMNS`] order.
    pub fn to_values(&self) -> [Value; 7] {
        [
            Value::Float(self.molecular_weight),
            Value::Float(self.tpsa),
            Value::Float(self.logp),
            Value::Int(self.h_acceptors as i64),
            Value::Int(self.h_donors as i64),
            Value::Int(self.ring_count as i64),
            Value::Bool(self.lipinski_pass),
        ]
    }

    /// Placeholder values for a molecule whose structure could not be parsed.
    pub fn missing_values() -> [Value; 7] {
        Default::default()
    }
}

/// Lipinski pass: weight < 500 and logP < 5 and donors < 5 and acceptors < 10.
pub fn lipinski_pass(molecular_weight: f64, logp: f64, h_donors: u32, h_acceptors: u32) -> bool {
    molecular_weight < LIPINSKI_MAX_WEIGHT
        && logp < LIPINSKI_MAX_LOGP
        && h_donors < LIPINSKI_MAX_DONORS
        && h_acceptors < LIPINSKI_MAX_ACCEPTORS
}
