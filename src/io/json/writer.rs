use crate::io::{WriteOptions, error::Error};
use crate::model::enriched::EnrichedTable;
use crate::model::value::Value;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::io::Write;

/// Writes the table as a pretty-printed JSON array of row objects.
///
/// Object keys follow column order; `Null` cells become `null`.
pub fn write<W: Write>(
    mut writer: W,
    table: &EnrichedTable,
    options: WriteOptions,
) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut writer, &Records { table, options })?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

struct Records<'a> {
    table: &'a EnrichedTable,
    options: WriteOptions,
}

struct Record<'a> {
    table: &'a EnrichedTable,
    key: Option<&'a str>,
    values: &'a [Value],
}

struct Cell<'a>(&'a Value);

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.table.row_count()))?;
        for row in &self.table.rows {
            seq.serialize_element(&Record {
                table: self.table,
                key: self.options.include_key.then_some(row.key.as_str()),
                values: &row.values,
            })?;
        }
        seq.end()
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.table.columns.len() + usize::from(self.key.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(key) = self.key {
            map.serialize_entry(&self.table.key_column, key)?;
        }
        for (column, value) in self.table.columns.iter().zip(self.values) {
            map.serialize_entry(column, &Cell(value))?;
        }
        map.end()
    }
}

impl Serialize for Cell<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}
