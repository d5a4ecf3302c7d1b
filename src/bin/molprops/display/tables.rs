use std::io::{self, Write};
use std::path::Path;

use molprops::RunReport;
use molprops::io::Format;

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_run_summary(report: &RunReport, output: &Path, format: Format) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    print_kv_table(&mut out, "Run Summary", &summary_rows(report, output, format));
}

fn summary_rows(report: &RunReport, output: &Path, format: Format) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Structure column", report.structure_column.clone()),
        ("Name column", report.name_column.clone()),
        ("Rows read", report.rows_in.to_string()),
        ("Duplicates", report.duplicates_dropped.to_string()),
        ("Rows written", report.rows_out.to_string()),
        ("Chunks", chunk_layout(&report.chunk_sizes)),
        ("Parse failures", report.parse_failures.to_string()),
    ];

    if report.rows_out > 0 {
        let pct = report.lipinski_passes as f64 / report.rows_out as f64 * 100.0;
        rows.push((
            "Lipinski pass",
            format!("{} ({:.1}%)", report.lipinski_passes, pct),
        ));
    }

    rows.push(("Output", format!("{} ({})", output.display(), format)));
    rows
}

fn chunk_layout(sizes: &[usize]) -> String {
    if sizes.is_empty() {
        return "none".to_string();
    }
    let layout: Vec<String> = sizes.iter().map(usize::to_string).collect();
    format!("{} [{}]", sizes.len(), layout.join(" · "))
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT, "Metric", "Value",
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_layout_lists_sizes() {
        assert_eq!(chunk_layout(&[3, 3, 2, 2]), "4 [3 · 3 · 2 · 2]");
        assert_eq!(chunk_layout(&[]), "none");
    }

    #[test]
    fn summary_includes_lipinski_share() {
        let report = RunReport {
            rows_in: 5,
            rows_out: 4,
            duplicates_dropped: 1,
            chunk_sizes: vec![2, 2],
            lipinski_passes: 3,
            ..Default::default()
        };
        let rows = summary_rows(&report, Path::new("out.csv"), Format::Csv);
        let lipinski = rows.iter().find(|(k, _)| *k == "Lipinski pass").unwrap();
        assert_eq!(lipinski.1, "3 (75.0%)");
        assert_eq!(rows.last().unwrap().1, "out.csv (CSV)");
    }

    #[test]
    fn empty_run_omits_lipinski_share() {
        let rows = summary_rows(&RunReport::default(), Path::new("out.json"), Format::Json);
        assert!(rows.iter().all(|(k, _)| *k != "Lipinski pass"));
    }

    #[test]
    fn table_rows_have_equal_width() {
        let mut buf = Vec::new();
        print_kv_table(
            &mut buf,
            "Run Summary",
            &[("Rows read", "10".to_string()), ("Chunks", "4 [3 · 3 · 2 · 2]".to_string())],
        );
        let text = String::from_utf8(buf).unwrap();
        let widths: Vec<usize> = text
            .lines()
            .skip(1)
            .map(|l| l.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{text}");
    }
}
