use crate::io::{Format, error::Error};
use crate::model::table::MoleculeTable;
use crate::model::value::Value;
use std::io::Read;

/// Reads a headed CSV table, typing each cell with [`Value::infer`].
///
/// Blank lines are skipped. Every record must have as many fields as the
/// header.
pub fn read<R: Read>(reader: R) -> Result<MoleculeTable, Error> {
    let mut csv = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
        return Err(Error::MissingHeader(Format::Csv));
    }

    let mut table = MoleculeTable::new(columns);
    for record in csv.records() {
        let record = record?;
        if record.len() != table.column_count() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(Error::row_width(line, table.column_count(), record.len()));
        }
        table.rows.push(record.iter().map(Value::infer).collect());
    }

    Ok(table)
}
