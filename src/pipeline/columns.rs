use tracing::warn;

use super::config::PipelineConfig;
use super::error::Error;
use crate::model::table::MoleculeTable;

/// The two columns every input must provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumns {
    pub structure: String,
    pub name: String,
}

/// Finds the column whose name equals `pattern`, ignoring case and
/// surrounding whitespace.
///
/// With several matches the first in column order wins and a warning is
/// logged.
pub fn resolve_column(table: &MoleculeTable, pattern: &str) -> Result<String, Error> {
    let wanted = pattern.trim();
    let mut matches = table
        .columns
        .iter()
        .filter(|c| c.trim().eq_ignore_ascii_case(wanted));

    let first = matches
        .next()
        .ok_or_else(|| Error::column_not_found(pattern, &table.columns))?;

    let extra: Vec<&str> = matches.map(String::as_str).collect();
    if !extra.is_empty() {
        warn!(
            pattern,
            chosen = first.as_str(),
            ignored = ?extra,
            "several columns match; using the first"
        );
    }

    Ok(first.clone())
}

/// Resolves the structure and name columns named by `config`.
pub fn resolve_key_columns(
    table: &MoleculeTable,
    config: &PipelineConfig,
) -> Result<KeyColumns, Error> {
    let structure = resolve_column(table, &config.structure_pattern)?;
    let name = resolve_column(table, &config.name_pattern)?;
    if structure == name {
        return Err(Error::InvalidConfig(format!(
            "structure and name patterns both resolve to column '{structure}'"
        )));
    }
    Ok(KeyColumns { structure, name })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str]) -> MoleculeTable {
        MoleculeTable::new(columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn matches_case_insensitively() {
        let t = table(&["smiles", "MOLECULE NAME", "Batch"]);
        assert_eq!(resolve_column(&t, "SMILES").unwrap(), "smiles");
        assert_eq!(resolve_column(&t, "Molecule name").unwrap(), "MOLECULE NAME");
    }

    #[test]
    fn ignores_surrounding_whitespace_in_headers() {
        let t = table(&[" SMILES ", "Molecule name"]);
        assert_eq!(resolve_column(&t, "SMILES").unwrap(), " SMILES ");
    }

    #[test]
    fn requires_whole_name_match() {
        let t = table(&["Canonical SMILES", "Molecule name"]);
        let err = resolve_column(&t, "SMILES").unwrap_err();
        match err {
            Error::ColumnNotFound { pattern, available } => {
                assert_eq!(pattern, "SMILES");
                assert_eq!(available, vec!["Canonical SMILES", "Molecule name"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn first_of_several_matches_wins() {
        let t = table(&["Smiles", "SMILES", "Molecule name"]);
        assert_eq!(resolve_column(&t, "smiles").unwrap(), "Smiles");
    }

    #[test]
    fn resolves_both_key_columns() {
        let t = table(&["Batch", "Molecule name", "SMILES"]);
        let keys = resolve_key_columns(&t, &PipelineConfig::default()).unwrap();
        assert_eq!(keys.structure, "SMILES");
        assert_eq!(keys.name, "Molecule name");
    }

    #[test]
    fn missing_name_column_is_fatal() {
        let t = table(&["SMILES", "Batch"]);
        let err = resolve_key_columns(&t, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { .. }));
    }

    #[test]
    fn identical_patterns_are_rejected() {
        let t = table(&["SMILES", "Molecule name"]);
        let config = PipelineConfig {
            name_pattern: "smiles".to_string(),
            ..Default::default()
        };
        let err = resolve_key_columns(&t, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
