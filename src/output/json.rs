//! JSON output formatting

use std::io::{self, Write};

use serde::Serialize;
use termcolor::WriteColor;

use crate::error::{ListingError, Result};
use crate::listing::Entry;

use super::formatter::Formatter;
use super::utils::entry_permissions;

/// Serializable view of one entry.
#[derive(Debug, Serialize)]
pub struct JsonEntry<'a> {
    pub name: &'a str,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inode: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<&'static str>,
}

impl<'a> JsonEntry<'a> {
    pub fn new(entry: &'a Entry, with_git: bool) -> Self {
        let stat = entry.stat.as_ref();
        Self {
            name: &entry.name,
            kind: entry.kind.as_str(),
            size: stat.map(|s| s.size),
            modified: stat.and_then(|s| s.modified()).map(|t| t.to_rfc3339()),
            mode: stat.map(|_| entry_permissions(entry)),
            inode: stat.map(|s| s.inode),
            links: stat.map(|s| s.nlink),
            uid: stat.map(|s| s.uid),
            gid: stat.map(|s| s.gid),
            target: entry.symlink_target.as_deref(),
            git: with_git.then(|| entry.git_status.as_str()),
        }
    }
}

impl Formatter {
    pub(super) fn write_json(&self, entries: &[Entry], out: &mut dyn WriteColor) -> Result<()> {
        let view: Vec<JsonEntry<'_>> = entries
            .iter()
            .map(|e| JsonEntry::new(e, self.config().show_git_status))
            .collect();
        serde_json::to_writer_pretty(&mut *out, &view).map_err(|e| match e.io_error_kind() {
            Some(kind) => ListingError::from(io::Error::from(kind)),
            None => ListingError::Output(io::Error::other(e)),
        })?;
        writeln!(out)?;
        Ok(())
    }
}
