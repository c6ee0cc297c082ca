//! Name-only layouts: columns, one per line, and comma separated

use std::io::Write;

use termcolor::WriteColor;

use crate::error::Result;
use crate::listing::Entry;

use super::config::COLUMN_PADDING;
use super::formatter::Formatter;

/// Number of columns for a terminal `width` and uniform `column_width`.
pub fn column_count(width: usize, column_width: usize) -> usize {
    (width / column_width.max(1)).max(1)
}

impl Formatter {
    pub(super) fn write_one_per_line(&self, entries: &[Entry], out: &mut dyn WriteColor) -> Result<()> {
        for entry in entries {
            self.write_entry(entry, out)?;
            writeln!(out)?;
        }
        Ok(())
    }

    pub(super) fn write_comma(&self, entries: &[Entry], out: &mut dyn WriteColor) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            self.write_entry(entry, out)?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Column-major grid sized to the terminal width.
    pub(super) fn write_columns(&self, entries: &[Entry], out: &mut dyn WriteColor) -> Result<()> {
        let widths: Vec<usize> = entries
            .iter()
            .map(|e| e.display_width(|e| self.entry_width(e)))
            .collect();
        let Some(&max_width) = widths.iter().max() else {
            return Ok(());
        };

        let column_width = max_width + COLUMN_PADDING;
        let columns = column_count(self.config().width, column_width);
        let rows = entries.len().div_ceil(columns);

        for row in 0..rows {
            for column in 0..columns {
                let idx = column * rows + row;
                if idx >= entries.len() {
                    break;
                }
                self.write_entry(&entries[idx], out)?;
                // The last column of data is never padded
                if idx + rows < entries.len() {
                    write!(out, "{:pad$}", "", pad = column_width - widths[idx])?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
