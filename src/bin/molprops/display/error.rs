use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_io_hints(err);
        collector.collect_pipeline_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use molprops::IoError;

        let Some(io_err) = err.downcast_ref::<IoError>() else {
            return;
        };

        self.mark_typed();

        match io_err {
            IoError::Io { source } => {
                self.collect_std_io_hints(source);
            }

            IoError::Csv(_) => {
                self.add("The input could not be read as CSV");
                self.add("Check quoting and delimiters; the library must be comma-separated");
            }

            IoError::Json(_) => {
                self.add("JSON encoding failed while writing the output");
                self.add("Try --format csv to rule out a JSON-specific problem");
            }

            IoError::MissingHeader(fmt) => {
                self.add(format!("The {} input must start with a header row", fmt));
                self.add("The header names the SMILES and molecule name columns");
            }

            IoError::RowWidth { line, expected, found } => {
                self.add(format!(
                    "Line {} has {} fields but the header has {}",
                    line, found, expected
                ));
                self.add("Quote fields that contain commas");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Make sure the input is UTF-8 encoded CSV");
            }

            ErrorKind::WriteZero | ErrorKind::StorageFull => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_pipeline_hints(&mut self, err: &Error) {
        use molprops::PipelineError;

        let Some(pipeline_err) = err.downcast_ref::<PipelineError>() else {
            return;
        };

        self.mark_typed();

        match pipeline_err {
            PipelineError::ColumnNotFound { pattern, .. } => {
                self.add(format!("No header matches '{}' (case-insensitive)", pattern));
                self.add("Use --smiles-column or --name-column to name the columns");
            }

            PipelineError::InvalidPartition { max_workers, .. } => {
                self.add(format!(
                    "With --max-workers {} the rows do not fit in the allowed chunks",
                    max_workers
                ));
                self.add("Raise --max-workers or --chunk-size");
            }

            PipelineError::WorkerFailure { chunk, .. } => {
                self.add(format!("The worker computing chunk {} did not finish", chunk));
                self.add("Re-run with -vv to see worker diagnostics");
                self.add("Try --isolation thread to rule out process spawning problems");
            }

            PipelineError::InvalidConfig(_) => {
                self.add("--chunk-size must be at least 1");
                self.add("Column names must not be blank");
            }

            PipelineError::ConfigParse(_) => {
                self.add("The --config file has invalid TOML or an unknown key");
                self.add("Known keys: chunk_size, max_workers, isolation, structure_pattern, name_pattern");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") {
            self.add("Input appears to be from a terminal");
            self.add("Provide input via -i/--input or pipe CSV to stdin");
            return;
        }

        if msg.contains("output format") {
            self.add("Name the output with a .csv or .json extension");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
