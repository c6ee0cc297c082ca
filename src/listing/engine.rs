//! Per-directory pipeline and the cycle-safe recursive walk

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use termcolor::WriteColor;

use crate::diagnostics::{Diagnostics, Severity};
use crate::error::{ListingError, Result};
use crate::git::StatusLookup;
use crate::output::Formatter;

use super::collector::EntryCollector;
use super::config::ListingOptions;
use super::cycle::CycleDetector;
use super::enhancer::MetadataEnhancer;
use super::entry::{Entry, EntryKind};
use super::sort::Sorter;

/// Runs collect → enhance → sort → format for each directory and, in
/// recursive mode, descends depth-first into subdirectories in sorted order.
pub struct RecursionEngine<'a> {
    options: ListingOptions,
    collector: EntryCollector,
    enhancer: MetadataEnhancer<'a>,
    sorter: Sorter,
    formatter: Formatter,
    visited: CycleDetector,
    sections: usize,
}

impl<'a> RecursionEngine<'a> {
    pub fn new(options: ListingOptions, formatter: Formatter) -> Self {
        Self {
            collector: EntryCollector::from_options(&options),
            enhancer: MetadataEnhancer::from_options(&options),
            sorter: Sorter::new(options.sort_config()),
            formatter,
            visited: CycleDetector::new(),
            sections: 0,
            options,
        }
    }

    pub fn with_git(mut self, git: Option<&'a dyn StatusLookup>) -> Self {
        self.enhancer = self.enhancer.with_git(git);
        self
    }

    pub fn options(&self) -> &ListingOptions {
        &self.options
    }

    /// List the command-line operands: plain files first as one batch, then
    /// each directory. Operands that cannot be reached are diagnostics.
    pub fn list_paths(
        &mut self,
        paths: &[PathBuf],
        out: &mut dyn WriteColor,
        diagnostics: &mut Diagnostics<'_>,
    ) -> Result<()> {
        let mut files = Vec::new();
        let mut dirs = Vec::new();

        let follow = !self.options.directory_only || self.options.dereference;
        for path in paths {
            match operand_entry(path, follow) {
                Ok(entry) if entry.is_directory() && !self.options.directory_only => {
                    dirs.push(entry.path)
                }
                Ok(entry) => files.push(entry),
                Err(e) => diagnostics.report(Severity::Serious, &e),
            }
        }

        if !files.is_empty() {
            self.enhancer.enhance(&mut files, diagnostics);
            self.sorter.sort(&mut files);
            self.begin_section(None, out)?;
            self.formatter.format(&files, out)?;
        }
        drop(files);

        let show_header = self.options.recursive || paths.len() > 1;
        for dir in dirs {
            match self.list_root(&dir, show_header, out, diagnostics) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => diagnostics.report(Severity::Serious, &e),
            }
        }
        Ok(())
    }

    /// List a single directory, recursing if configured. Failure to read
    /// `dir` itself is returned to the caller.
    pub fn list_directory(
        &mut self,
        dir: &Path,
        out: &mut dyn WriteColor,
        diagnostics: &mut Diagnostics<'_>,
    ) -> Result<()> {
        let show_header = self.options.recursive;
        self.list_root(dir, show_header, out, diagnostics)
    }

    fn list_root(
        &mut self,
        dir: &Path,
        show_header: bool,
        out: &mut dyn WriteColor,
        diagnostics: &mut Diagnostics<'_>,
    ) -> Result<()> {
        if self.options.recursive {
            let seen = self
                .visited
                .check_and_mark_visited(dir)
                .map_err(|e| ListingError::access(dir, e))?;
            if seen {
                report_already_listed(dir, diagnostics);
                return Ok(());
            }
        }
        self.walk(dir, show_header, out, diagnostics)
    }

    fn walk(
        &mut self,
        dir: &Path,
        show_header: bool,
        out: &mut dyn WriteColor,
        diagnostics: &mut Diagnostics<'_>,
    ) -> Result<()> {
        let mut entries = self.collector.collect(dir)?;
        self.enhancer.enhance(&mut entries, diagnostics);
        self.sorter.sort(&mut entries);

        self.begin_section(show_header.then_some(dir), out)?;
        self.formatter.format(&entries, out)?;

        if !self.options.recursive || self.options.directory_only {
            return Ok(());
        }

        // Only the child paths outlive this directory's batch
        let children: Vec<PathBuf> = entries
            .iter()
            .filter(|e| self.should_descend(e))
            .map(|e| e.path.clone())
            .collect();
        drop(entries);

        for child in children {
            match self.visited.check_and_mark_visited(&child) {
                Ok(false) => {}
                Ok(true) => {
                    report_already_listed(&child, diagnostics);
                    continue;
                }
                Err(e) => {
                    diagnostics.error(&ListingError::access(&child, e));
                    continue;
                }
            }

            tracing::debug!(dir = %child.display(), "descending");
            match self.walk(&child, true, out, diagnostics) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => diagnostics.error(&e),
            }
        }
        Ok(())
    }

    fn should_descend(&self, entry: &Entry) -> bool {
        if entry.is_dot_entry() {
            return false;
        }
        match entry.kind {
            EntryKind::Directory => true,
            EntryKind::Symlink if self.options.dereference => {
                fs::metadata(&entry.path).is_ok_and(|m| m.is_dir())
            }
            _ => false,
        }
    }

    /// Blank line between sections, then an optional `path:` header.
    fn begin_section(&mut self, header: Option<&Path>, out: &mut dyn WriteColor) -> Result<()> {
        if self.sections > 0 {
            writeln!(out)?;
        }
        if let Some(path) = header {
            writeln!(out, "{}:", path.display())?;
        }
        self.sections += 1;
        Ok(())
    }
}

fn report_already_listed(dir: &Path, diagnostics: &mut Diagnostics<'_>) {
    tracing::debug!(dir = %dir.display(), "cycle detected");
    diagnostics.report(
        Severity::Notice,
        format!("{}: not listing already-listed directory", dir.display()),
    );
}

/// Describe a command-line operand. A symlink to a directory counts as the
/// directory unless `follow` is off.
fn operand_entry(path: &Path, follow: bool) -> Result<Entry> {
    let link_metadata = fs::symlink_metadata(path).map_err(|e| ListingError::access(path, e))?;
    let file_type = match fs::metadata(path) {
        Ok(metadata) if follow && metadata.is_dir() => metadata.file_type(),
        _ => link_metadata.file_type(),
    };
    Ok(Entry::from_file_type(path.display().to_string(), path, file_type))
}
