use std::env;

use anyhow::{Context, Result};

use molprops::{Dispatcher, Isolation, ProcessDispatcher, SmilesEngine, ThreadDispatcher};

/// Builds the dispatcher for the configured isolation mode.
///
/// Process workers re-run this executable's hidden `worker` command, passing
/// the verbosity along so worker logs match the parent's.
pub fn build_dispatcher(isolation: Isolation, verbose: u8) -> Result<Box<dyn Dispatcher>> {
    match isolation {
        Isolation::Process => {
            let exe = env::current_exe().context("Cannot locate the molprops executable")?;
            let flags = (0..verbose).map(|_| "--verbose");
            Ok(Box::new(ProcessDispatcher::new(exe).arg("worker").args(flags)))
        }
        Isolation::Thread => Ok(Box::new(ThreadDispatcher::new(SmilesEngine))),
    }
}
