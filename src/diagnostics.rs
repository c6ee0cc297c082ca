//! Diagnostic channel for non-fatal problems
//!
//! Diagnostics are user-facing messages written to a channel separate from the
//! listing output (stderr in the binary). The sink counts what it emitted so the
//! caller can derive an exit status.

use std::fmt::Display;
use std::io::{self, Write};

use crate::error::ListingError;

/// How serious a diagnostic is, which drives the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Something was skipped on purpose (e.g. an already-listed directory).
    Notice,
    /// A single entry or subdirectory could not be listed.
    Minor,
    /// A command-line operand could not be listed at all.
    Serious,
}

pub struct Diagnostics<'a> {
    sink: Box<dyn Write + 'a>,
    program: &'static str,
    emitted: usize,
    worst: Option<Severity>,
}

impl<'a> Diagnostics<'a> {
    pub fn new(sink: impl Write + 'a) -> Self {
        Self {
            sink: Box::new(sink),
            program: env!("CARGO_PKG_NAME"),
            emitted: 0,
            worst: None,
        }
    }

    /// Diagnostics written to stderr.
    pub fn stderr() -> Diagnostics<'static> {
        Diagnostics::new(io::stderr())
    }

    /// A sink that discards everything but still counts.
    pub fn sink() -> Diagnostics<'static> {
        Diagnostics::new(io::sink())
    }

    pub fn report(&mut self, severity: Severity, message: impl Display) {
        self.emitted += 1;
        self.worst = self.worst.max(Some(severity));
        tracing::debug!(?severity, %message, "diagnostic");
        // The diagnostic channel is best effort; a failed write here must not
        // turn into a listing failure.
        let _ = writeln!(self.sink, "{}: {}", self.program, message);
    }

    pub fn error(&mut self, err: &ListingError) {
        self.report(Severity::Minor, err);
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn worst(&self) -> Option<Severity> {
        self.worst
    }

    /// Exit status the CLI layer derives from the run: 0 clean, 1 for
    /// per-entry problems, 2 if an operand could not be listed.
    pub fn exit_code(&self) -> i32 {
        match self.worst {
            None => 0,
            Some(Severity::Notice) | Some(Severity::Minor) => 1,
            Some(Severity::Serious) => 2,
        }
    }
}
