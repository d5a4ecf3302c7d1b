use std::collections::HashSet;

use tracing::debug;

use super::error::Error;
use crate::model::table::{MoleculeTable, Row};
use crate::model::value::Value;

/// Row counts before and after deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrepareReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub duplicates_dropped: usize,
}

/// Moves the structure and name columns to positions 0 and 1 and drops
/// rows whose name was already seen.
///
/// Remaining columns keep their original relative order. Names compare by
/// their textual rendering, so a `Null` name collides with an empty one.
/// Numeric-looking names keep their input text (see [`Value::infer`]), so
/// `007` and `7` are different molecules.
/// Applying this twice is the same as applying it once.
pub fn prepare(
    table: MoleculeTable,
    structure_column: &str,
    name_column: &str,
) -> Result<(MoleculeTable, PrepareReport), Error> {
    let structure_idx = table
        .column_index(structure_column)
        .ok_or_else(|| Error::column_not_found(structure_column, &table.columns))?;
    let name_idx = table
        .column_index(name_column)
        .ok_or_else(|| Error::column_not_found(name_column, &table.columns))?;
    if structure_idx == name_idx {
        return Err(Error::InvalidConfig(format!(
            "structure and name column are both '{structure_column}'"
        )));
    }

    let order: Vec<usize> = [structure_idx, name_idx]
        .into_iter()
        .chain((0..table.column_count()).filter(|&i| i != structure_idx && i != name_idx))
        .collect();

    let columns = order.iter().map(|&i| table.columns[i].clone()).collect();
    let rows_in = table.row_count();

    let mut seen = HashSet::with_capacity(rows_in);
    let mut rows = Vec::with_capacity(rows_in);
    for mut row in table.rows {
        let key = row.get(name_idx).map(Value::to_key).unwrap_or_default();
        if !seen.insert(key) {
            continue;
        }
        rows.push(reorder(&mut row, &order));
    }

    let report = PrepareReport {
        rows_in,
        rows_out: rows.len(),
        duplicates_dropped: rows_in - rows.len(),
    };
    debug!(?report, "prepared table");

    Ok((MoleculeTable { columns, rows }, report))
}

fn reorder(row: &mut Row, order: &[usize]) -> Row {
    order
        .iter()
        .map(|&i| row.get_mut(i).map(std::mem::take).unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MoleculeTable {
        MoleculeTable::from_text_rows(
            ["Batch", "Molecule name", "Vendor", "SMILES"],
            [
                ["1", "ethanol", "acme", "CCO"],
                ["2", "methane", "acme", "C"],
                ["3", "ethanol", "other", "OCC"],
                ["4", "benzene", "", "c1ccccc1"],
            ],
        )
    }

    #[test]
    fn moves_key_columns_to_front() {
        let (table, _) = prepare(sample(), "SMILES", "Molecule name").unwrap();
        assert_eq!(
            table.columns,
            vec!["SMILES", "Molecule name", "Batch", "Vendor"]
        );
        assert_eq!(
            table.rows[0],
            vec![
                Value::from("CCO"),
                Value::from("ethanol"),
                Value::Int(1),
                Value::from("acme")
            ]
        );
    }

    #[test]
    fn keeps_first_occurrence_of_each_name() {
        let (table, report) = prepare(sample(), "SMILES", "Molecule name").unwrap();
        let names: Vec<_> = table.column_values(1).map(Value::to_key).collect();
        assert_eq!(names, vec!["ethanol", "methane", "benzene"]);
        assert_eq!(table.rows[0][0], Value::from("CCO"));
        assert_eq!(
            report,
            PrepareReport {
                rows_in: 4,
                rows_out: 3,
                duplicates_dropped: 1
            }
        );
    }

    #[test]
    fn is_idempotent() {
        let (once, _) = prepare(sample(), "SMILES", "Molecule name").unwrap();
        let (twice, report) = prepare(once.clone(), "SMILES", "Molecule name").unwrap();
        assert_eq!(once, twice);
        assert_eq!(report.duplicates_dropped, 0);
    }

    #[test]
    fn null_names_collide_with_each_other() {
        let table = MoleculeTable::from_text_rows(
            ["SMILES", "Molecule name"],
            [["C", ""], ["CC", ""], ["CCC", "propane"]],
        );
        let (table, report) = prepare(table, "SMILES", "Molecule name").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(report.duplicates_dropped, 1);
    }

    #[test]
    fn numeric_names_keep_their_spelling() {
        let table = MoleculeTable::from_text_rows(
            ["SMILES", "Molecule name"],
            [["C", "007"], ["CC", "7"], ["CCC", "1.10"], ["CCCC", "1.1"]],
        );
        let (table, report) = prepare(table, "SMILES", "Molecule name").unwrap();
        assert_eq!(report.duplicates_dropped, 0);
        let names: Vec<_> = table.column_values(1).map(Value::to_key).collect();
        assert_eq!(names, vec!["007", "7", "1.10", "1.1"]);
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let mut table = MoleculeTable::new(vec![
            "SMILES".into(),
            "Molecule name".into(),
            "Note".into(),
        ]);
        table.rows.push(vec![Value::from("C"), Value::from("methane")]);
        let (table, _) = prepare(table, "SMILES", "Molecule name").unwrap();
        assert_eq!(table.rows[0][2], Value::Null);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let err = prepare(sample(), "Structure", "Molecule name").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { .. }));
    }
}
