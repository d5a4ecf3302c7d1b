use anyhow::{Context, Result, bail};

use molprops::io::{Format, WriteOptions, persist_atomic, read_csv, write_table};
use molprops::{Pipeline, RunReport};

use crate::cli::{OutputFormat, RunArgs};
use crate::config::{build_dispatcher, build_pipeline_config};
use crate::display::{Context as DisplayContext, Progress, print_run_summary};
use crate::io::{open_input, stdin_is_tty};
use crate::util::text::plural;

const TOTAL_STEPS: u8 = 3;

pub fn run_pipeline(args: RunArgs, ctx: DisplayContext, verbose: u8) -> Result<()> {
    if args.io.input.is_none() && stdin_is_tty() {
        bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: molprops run -i <LIBRARY.csv> or pipe CSV via stdin."
        );
    }

    let format = resolve_output_format(&args)?;
    let config = build_pipeline_config(&args.pipeline)?;
    let dispatcher = build_dispatcher(config.isolation, verbose)?;
    let isolation = config.isolation;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading library");
    let input = open_input(args.io.input.as_deref())?;
    let table = read_csv(input).context("Failed to read the input library")?;
    let read_substeps = [
        format!("{} rows", table.row_count()),
        format!("{} columns", table.column_count()),
    ];
    progress.complete_step("Reading library", &as_refs(&read_substeps));

    progress.step("Computing descriptors");
    let output = Pipeline::new(config, dispatcher)
        .run(table)
        .context("Descriptor computation failed")?;
    let compute_substeps = build_compute_substeps(&output.report, &format!("{isolation:?}"));
    progress.complete_step("Computing descriptors", &as_refs(&compute_substeps));

    progress.step("Writing output");
    let options = WriteOptions {
        include_key: args.io.with_key,
    };
    persist_atomic(&args.io.output, |w| {
        write_table(format, w, &output.table, options)
    })
    .with_context(|| format!("Failed to write output file: {}", args.io.output.display()))?;
    let write_substeps = [format!("{} → {}", format, args.io.output.display())];
    progress.complete_step("Writing output", &as_refs(&write_substeps));

    if ctx.interactive {
        print_run_summary(&output.report, &args.io.output, format);
    }

    progress.finish(output.report.rows_out);
    Ok(())
}

fn resolve_output_format(args: &RunArgs) -> Result<Format> {
    if let Some(fmt) = args.io.format {
        return Ok(match fmt {
            OutputFormat::Csv => Format::Csv,
            OutputFormat::Json => Format::Json,
        });
    }
    match Format::from_path(&args.io.output) {
        Some(fmt) => Ok(fmt),
        None => bail!(
            "Cannot infer output format from '{}'. Use --format csv or --format json.",
            args.io.output.display()
        ),
    }
}

fn build_compute_substeps(report: &RunReport, isolation: &str) -> Vec<String> {
    let mut substeps = vec![
        format!(
            "Columns: {} / {}",
            report.structure_column, report.name_column
        ),
        format!(
            "{} across {} ({} isolation)",
            plural(report.rows_out, "molecule"),
            plural(report.chunk_count(), "chunk"),
            isolation.to_lowercase()
        ),
    ];
    if report.duplicates_dropped > 0 {
        substeps.push(format!(
            "Dropped {}",
            plural(report.duplicates_dropped, "duplicate name")
        ));
    }
    if report.parse_failures > 0 {
        substeps.push(format!(
            "{} could not be parsed",
            plural(report.parse_failures, "structure")
        ));
    }
    substeps
}

fn as_refs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_substeps_mention_drops_and_failures_only_when_present() {
        let mut report = RunReport {
            structure_column: "SMILES".into(),
            name_column: "Molecule name".into(),
            rows_out: 10,
            chunk_sizes: vec![3, 3, 2, 2],
            ..Default::default()
        };
        let plain = build_compute_substeps(&report, "Process");
        assert_eq!(plain.len(), 2);
        assert_eq!(plain[1], "10 molecules across 4 chunks (process isolation)");

        report.duplicates_dropped = 1;
        report.parse_failures = 2;
        let noisy = build_compute_substeps(&report, "Thread");
        assert_eq!(noisy[2], "Dropped 1 duplicate name");
        assert_eq!(noisy[3], "2 structures could not be parsed");
    }
}
