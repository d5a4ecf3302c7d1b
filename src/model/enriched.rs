use serde::{Deserialize, Serialize};

use super::value::Value;

/// A computed row, addressable by the molecule name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub key: String,
    pub values: Vec<Value>,
}

/// The pipeline output: the prepared table keyed by its name column, with
/// the descriptor columns appended.
///
/// `columns` lists the non-key columns only (structure column first, then
/// metadata columns, then descriptors); each row's `values` is aligned with it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnrichedTable {
    pub key_column: String,
    pub columns: Vec<String>,
    pub rows: Vec<EnrichedRow>,
}

impl EnrichedTable {
    pub fn new(key_column: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            key_column: key_column.into(),
            columns,
            rows: Vec::new(),
        }
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|r| r.key.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Looks up a row by key. Linear; keys are unique after preparation.
    pub fn get(&self, key: &str) -> Option<&EnrichedRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// Looks up one cell by row key and column name.
    pub fn value(&self, key: &str, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.get(key)?.values.get(col)
    }

    /// Appends another fragment's rows. Column layouts must match.
    pub fn extend_from(&mut self, other: EnrichedTable) -> Result<(), String> {
        if self.columns.is_empty() && self.rows.is_empty() {
            self.key_column = other.key_column;
            self.columns = other.columns;
            self.rows = other.rows;
            return Ok(());
        }
        if other.columns != self.columns || other.key_column != self.key_column {
            return Err(format!(
                "column layout mismatch: expected [{}] keyed by '{}', got [{}] keyed by '{}'",
                self.columns.join(", "),
                self.key_column,
                other.columns.join(", "),
                other.key_column
            ));
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(keys: &[&str]) -> EnrichedTable {
        let mut t = EnrichedTable::new("Molecule name", vec!["SMILES".into(), "TPSA".into()]);
        for k in keys {
            t.rows.push(EnrichedRow {
                key: (*k).to_string(),
                values: vec![Value::from("C"), Value::Float(0.0)],
            });
        }
        t
    }

    #[test]
    fn extend_into_empty_adopts_layout() {
        let mut acc = EnrichedTable::default();
        acc.extend_from(fragment(&["a", "b"])).unwrap();
        assert_eq!(acc.key_column, "Molecule name");
        assert_eq!(acc.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn extend_preserves_order() {
        let mut acc = fragment(&["a"]);
        acc.extend_from(fragment(&["b", "c"])).unwrap();
        assert_eq!(acc.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn extend_rejects_mismatched_columns() {
        let mut acc = fragment(&["a"]);
        let other = EnrichedTable::new("Molecule name", vec!["SMILES".into()]);
        assert!(acc.extend_from(other).is_err());
    }

    #[test]
    fn value_lookup_by_key_and_column() {
        let t = fragment(&["a"]);
        assert_eq!(t.value("a", "SMILES"), Some(&Value::from("C")));
        assert_eq!(t.value("a", "logP"), None);
        assert_eq!(t.value("zz", "SMILES"), None);
    }
}
