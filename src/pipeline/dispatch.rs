//! Concurrent execution of chunk computations.
//!
//! Both dispatchers start one worker per chunk, wait for every worker they
//! started, and hand results back in partition order no matter which worker
//! finished first. When workers fail, the failure with the lowest chunk index
//! is reported.

use std::any::Any;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use super::compute::{ChunkResult, compute_chunk};
use super::error::Error;
use super::worker::{WorkerRequest, WorkerResponse};
use crate::chem::ChemistryEngine;
use crate::model::table::Chunk;

/// Lines of a failed worker's stderr kept in the error detail.
const STDERR_TAIL_LINES: usize = 20;

/// Runs chunk computations and gathers their results in submission order.
pub trait Dispatcher {
    fn dispatch(&self, chunks: Vec<Chunk>) -> Result<Vec<ChunkResult>, Error>;
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    fn dispatch(&self, chunks: Vec<Chunk>) -> Result<Vec<ChunkResult>, Error> {
        (**self).dispatch(chunks)
    }
}

/// One scoped thread per chunk, sharing a single engine.
#[derive(Debug, Default, Clone)]
pub struct ThreadDispatcher<E> {
    engine: E,
}

impl<E: ChemistryEngine> ThreadDispatcher<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }
}

impl<E: ChemistryEngine> Dispatcher for ThreadDispatcher<E> {
    fn dispatch(&self, chunks: Vec<Chunk>) -> Result<Vec<ChunkResult>, Error> {
        let engine = &self.engine;
        let outcomes: Vec<Result<ChunkResult, String>> = thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .iter()
                .map(|chunk| {
                    debug!(chunk = chunk.index, rows = chunk.row_count(), "dispatching chunk to thread");
                    scope.spawn(move || compute_chunk(chunk, engine))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().map_err(panic_message))
                .collect()
        });

        gather(&chunks, outcomes)
    }
}

/// One OS process per chunk.
///
/// Each child is started as `program args...`, receives a
/// [`WorkerRequest`] on stdin and must answer with a [`WorkerResponse`] on
/// stdout. A child that cannot be started, exits unsuccessfully, prints
/// something that is not a response, or answers for the wrong chunk is a
/// worker failure.
#[derive(Debug, Clone)]
pub struct ProcessDispatcher {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessDispatcher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn run_worker(&self, chunk: &Chunk) -> Result<ChunkResult, String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("could not start '{}': {e}", self.program.display()))?;

        let sent = match child.stdin.take() {
            Some(mut stdin) => serde_json::to_writer(&mut stdin, &WorkerRequest::borrowed(chunk))
                .map_err(|e| e.to_string())
                .and_then(|()| stdin.flush().map_err(|e| e.to_string())),
            None => Err("worker stdin unavailable".to_string()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| format!("could not wait for worker: {e}"))?;

        if !output.status.success() {
            return Err(format!(
                "worker exited with {}{}",
                output.status,
                stderr_tail(&output.stderr)
            ));
        }
        sent.map_err(|e| format!("could not send chunk to worker: {e}"))?;

        let response: WorkerResponse = serde_json::from_slice(&output.stdout).map_err(|e| {
            format!(
                "unreadable worker output: {e}{}",
                stderr_tail(&output.stderr)
            )
        })?;

        if response.result.index != chunk.index {
            return Err(format!(
                "worker answered for chunk {} instead",
                response.result.index
            ));
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!(chunk = chunk.index, "worker: {line}");
        }
        Ok(response.result)
    }
}

impl Dispatcher for ProcessDispatcher {
    fn dispatch(&self, chunks: Vec<Chunk>) -> Result<Vec<ChunkResult>, Error> {
        let outcomes: Vec<Result<ChunkResult, String>> = thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .iter()
                .map(|chunk| {
                    debug!(chunk = chunk.index, rows = chunk.row_count(), program = %self.program.display(), "dispatching chunk to process");
                    scope.spawn(move || self.run_worker(chunk))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().map_err(panic_message).and_then(|r| r))
                .collect()
        });

        gather(&chunks, outcomes)
    }
}

fn gather(
    chunks: &[Chunk],
    outcomes: Vec<Result<ChunkResult, String>>,
) -> Result<Vec<ChunkResult>, Error> {
    chunks
        .iter()
        .zip(outcomes)
        .map(|(chunk, outcome)| {
            outcome
                .inspect(|r| {
                    debug!(chunk = chunk.index, rows = r.table.row_count(), "chunk completed")
                })
                .map_err(|detail| Error::worker_failure(chunk.index, detail))
        })
        .collect()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    format!("worker panicked: {message}")
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.trim().lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    format!("; stderr: {}", lines[start..].join("\n"))
}
