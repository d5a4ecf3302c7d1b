mod run;
mod worker;

use run::run_pipeline;
use worker::run_worker;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context, verbose: u8) -> Result<()> {
    match command {
        Command::Run(args) => run_pipeline(args, ctx, verbose),
        Command::Worker => run_worker(),
    }
}
