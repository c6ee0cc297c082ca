//! Layout dispatch and entry name rendering

use std::io::Write;

use termcolor::{NoColor, WriteColor};
use unicode_width::UnicodeWidthStr;
use users::UsersCache;

use crate::error::{ListingError, Result};
use crate::listing::{Entry, Layout};

use super::config::OutputConfig;
use super::style::StyleContext;

/// Renders one directory batch in the configured layout.
pub struct Formatter {
    config: OutputConfig,
    style: StyleContext,
    pub(super) users: UsersCache,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        let style = StyleContext::new(config.use_color, config.use_icons);
        Self {
            config,
            style,
            users: UsersCache::new(),
        }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn style(&self) -> &StyleContext {
        &self.style
    }

    pub fn format(&self, entries: &[Entry], out: &mut dyn WriteColor) -> Result<()> {
        match self.config.layout {
            Layout::Columns => self.write_columns(entries, out),
            Layout::OnePerLine => self.write_one_per_line(entries, out),
            Layout::Comma => self.write_comma(entries, out),
            Layout::Long => self.write_long(entries, out),
            Layout::Json => self.write_json(entries, out),
        }
    }

    /// Render without color into a string.
    pub fn format_to_string(&self, entries: &[Entry]) -> Result<String> {
        let mut out = NoColor::new(Vec::new());
        self.format(entries, &mut out)?;
        String::from_utf8(out.into_inner())
            .map_err(|e| ListingError::Output(std::io::Error::other(e)))
    }

    /// Width of everything `write_entry` prints for `entry`.
    pub fn entry_width(&self, entry: &Entry) -> usize {
        let mut width = entry.name.width();
        if self.config.show_inodes {
            width += self.inode_label(entry).len() + 1;
        }
        if self.config.show_git_status {
            width += 2;
        }
        width += self.style.icon_width(entry);
        if self.config.type_indicators && entry.type_indicator().is_some() {
            width += 1;
        }
        width
    }

    pub(super) fn inode_label(&self, entry: &Entry) -> String {
        entry
            .stat
            .as_ref()
            .map(|s| s.inode.to_string())
            .unwrap_or_else(|| super::utils::PLACEHOLDER.to_string())
    }

    /// Inode prefix (if enabled) followed by the decorated name.
    pub(super) fn write_entry(&self, entry: &Entry, out: &mut dyn WriteColor) -> Result<()> {
        if self.config.show_inodes {
            write!(out, "{} ", self.inode_label(entry))?;
        }
        self.write_name(entry, out)
    }

    /// Git indicator, icon, colored name and type indicator.
    pub(super) fn write_name(&self, entry: &Entry, out: &mut dyn WriteColor) -> Result<()> {
        if self.config.show_git_status {
            let indicator = entry.git_status.indicator();
            match self.style.git_color(entry.git_status) {
                Some(spec) => {
                    out.set_color(&spec)?;
                    write!(out, "{}", indicator)?;
                    out.reset()?;
                }
                None => write!(out, "{}", indicator)?,
            }
            write!(out, " ")?;
        }

        if let Some(icon) = self.style.icon(entry) {
            write!(out, "{} ", icon)?;
        }

        match self.style.name_color(entry) {
            Some(spec) => {
                out.set_color(&spec)?;
                write!(out, "{}", entry.name)?;
                out.reset()?;
            }
            None => write!(out, "{}", entry.name)?,
        }

        if self.config.type_indicators {
            if let Some(c) = entry.type_indicator() {
                write!(out, "{}", c)?;
            }
        }
        Ok(())
    }
}
