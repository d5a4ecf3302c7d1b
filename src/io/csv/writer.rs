use crate::io::{WriteOptions, error::Error};
use crate::model::enriched::EnrichedTable;
use std::io::Write;

/// Writes the table as CSV with a header row.
///
/// `Null` cells become empty fields and floats keep full precision.
pub fn write<W: Write>(
    writer: W,
    table: &EnrichedTable,
    options: WriteOptions,
) -> Result<(), Error> {
    let mut csv = ::csv::Writer::from_writer(writer);

    let key = options.include_key.then_some(table.key_column.as_str());
    csv.write_record(key.into_iter().chain(table.columns.iter().map(String::as_str)))?;

    for row in &table.rows {
        let key = options.include_key.then(|| row.key.clone());
        csv.write_record(key.into_iter().chain(row.values.iter().map(|v| v.to_string())))?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::enriched::EnrichedRow;
    use crate::model::value::Value;

    fn table() -> EnrichedTable {
        let mut t = EnrichedTable::new(
            "Molecule name",
            vec!["SMILES".into(), "TPSA".into(), "Lipinski pass".into()],
        );
        t.rows.push(EnrichedRow {
            key: "ethanol".into(),
            values: vec![Value::from("CCO"), Value::Float(20.23), Value::Bool(true)],
        });
        t.rows.push(EnrichedRow {
            key: "broken, really".into(),
            values: vec![Value::from("C1CC"), Value::Null, Value::Null],
        });
        t
    }

    fn render(options: WriteOptions) -> String {
        let mut out = Vec::new();
        write(&mut out, &table(), options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn omits_key_column_by_default() {
        assert_eq!(
            render(WriteOptions::default()),
            "SMILES,TPSA,Lipinski pass\nCCO,20.23,True\nC1CC,,\n"
        );
    }

    #[test]
    fn includes_key_column_on_request() {
        assert_eq!(
            render(WriteOptions { include_key: true }),
            "Molecule name,SMILES,TPSA,Lipinski pass\n\
             ethanol,CCO,20.23,True\n\
             \"broken, really\",C1CC,,\n"
        );
    }

    #[test]
    fn written_table_reads_back() {
        let mut out = Vec::new();
        write(&mut out, &table(), WriteOptions { include_key: true }).unwrap();
        let back = crate::io::csv::reader::read(out.as_slice()).unwrap();
        assert_eq!(back.row_count(), 2);
        assert_eq!(back.rows[0][2], Value::Float(20.23));
        assert_eq!(back.rows[1][2], Value::Null);
    }
}
