use serde::{Deserialize, Serialize};

use super::value::Value;

/// One table row, aligned position-by-position with the owning table's columns.
pub type Row = Vec<Value>;

/// An in-memory molecule table: ordered column names and ordered rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MoleculeTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl MoleculeTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from string literals; convenient for tests and examples.
    pub fn from_text_rows<C, R>(columns: C, rows: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator,
        <R::Item as IntoIterator>::Item: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| Value::infer(&cell.into()))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, in row order. Missing cells read as `Null`.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        static NULL: Value = Value::Null;
        self.rows.iter().map(move |row| row.get(index).unwrap_or(&NULL))
    }
}

/// A contiguous, order-preserving slice of a prepared [`MoleculeTable`].
///
/// A chunk is self-describing: it carries the column names and the positions
/// of the structure and name columns, so it can be shipped to an isolated
/// worker process without any other context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Partition index, `0..chunk_count`.
    pub index: usize,
    pub structure_column: usize,
    pub name_column: usize,
    pub table: MoleculeTable,
}

impl Chunk {
    #[inline]
    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn structure_column_name(&self) -> &str {
        &self.table.columns[self.structure_column]
    }

    pub fn name_column_name(&self) -> &str {
        &self.table.columns[self.name_column]
    }
}
