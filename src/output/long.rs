//! Long (`-l`) layout

use std::io::Write;

use chrono::Utc;
use termcolor::WriteColor;
use users::{Groups, Users};

use crate::error::Result;
use crate::listing::Entry;

use super::formatter::Formatter;
use super::utils::{PLACEHOLDER, entry_permissions, render_size, render_time};

/// Pre-rendered text columns for one long-format row.
struct LongRow {
    inode: String,
    permissions: String,
    links: String,
    owner: String,
    group: String,
    size: String,
    time: String,
}

#[derive(Default)]
struct ColumnWidths {
    inode: usize,
    links: usize,
    owner: usize,
    group: usize,
    size: usize,
    time: usize,
}

impl ColumnWidths {
    fn measure(rows: &[LongRow]) -> Self {
        rows.iter().fold(Self::default(), |w, r| Self {
            inode: w.inode.max(r.inode.len()),
            links: w.links.max(r.links.len()),
            owner: w.owner.max(r.owner.chars().count()),
            group: w.group.max(r.group.chars().count()),
            size: w.size.max(r.size.len()),
            time: w.time.max(r.time.chars().count()),
        })
    }
}

/// Sum of 512-byte blocks over every entry that has a stat.
pub fn total_blocks(entries: &[Entry]) -> u64 {
    entries
        .iter()
        .filter_map(|e| e.stat.as_ref())
        .map(|s| s.size_blocks())
        .sum()
}

impl Formatter {
    fn owner_name(&self, uid: u32) -> String {
        if self.config().numeric_ids {
            return uid.to_string();
        }
        self.users
            .get_user_by_uid(uid)
            .map(|u| u.name().to_string_lossy().into_owned())
            .unwrap_or_else(|| uid.to_string())
    }

    fn group_name(&self, gid: u32) -> String {
        if self.config().numeric_ids {
            return gid.to_string();
        }
        self.users
            .get_group_by_gid(gid)
            .map(|g| g.name().to_string_lossy().into_owned())
            .unwrap_or_else(|| gid.to_string())
    }

    fn long_row(&self, entry: &Entry, now: chrono::DateTime<Utc>) -> LongRow {
        let config = self.config();
        let stat = entry.stat.as_ref();
        let placeholder = || PLACEHOLDER.to_string();
        LongRow {
            inode: self.inode_label(entry),
            permissions: entry_permissions(entry),
            links: stat.map(|s| s.nlink.to_string()).unwrap_or_else(placeholder),
            owner: stat.map(|s| self.owner_name(s.uid)).unwrap_or_else(placeholder),
            group: stat.map(|s| self.group_name(s.gid)).unwrap_or_else(placeholder),
            size: render_size(stat, config.size_style),
            time: render_time(stat, config.time_style, now),
        }
    }

    pub(super) fn write_long(&self, entries: &[Entry], out: &mut dyn WriteColor) -> Result<()> {
        writeln!(out, "total {}", total_blocks(entries))?;

        let now = Utc::now();
        let rows: Vec<LongRow> = entries.iter().map(|e| self.long_row(e, now)).collect();
        let w = ColumnWidths::measure(&rows);

        for (entry, row) in entries.iter().zip(&rows) {
            if self.config().show_inodes {
                write!(out, "{:>width$} ", row.inode, width = w.inode)?;
            }
            write!(
                out,
                "{} {:>lw$} {:<ow$} {:<gw$} {:>sw$} {:<tw$} ",
                row.permissions,
                row.links,
                row.owner,
                row.group,
                row.size,
                row.time,
                lw = w.links,
                ow = w.owner,
                gw = w.group,
                sw = w.size,
                tw = w.time,
            )?;
            self.write_name(entry, out)?;
            if let Some(target) = &entry.symlink_target {
                write!(out, " -> {}", target)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
