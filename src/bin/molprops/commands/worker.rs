use std::io;

use anyhow::{Context, Result};
use tracing::debug;

use molprops::SmilesEngine;
use molprops::pipeline::worker::serve;

/// Entry point of a process-isolated worker: one chunk in on stdin, one
/// result out on stdout.
pub fn run_worker() -> Result<()> {
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    let index = serve(stdin, stdout, &SmilesEngine).context("Worker failed to serve chunk")?;
    debug!(chunk = index, "worker done");
    Ok(())
}
