//! Color and icon styling for entry names

use termcolor::{Color, ColorSpec};
use unicode_width::UnicodeWidthChar;

use crate::git::GitStatus;
use crate::listing::{Entry, FileClass};

/// Decides how an entry name is decorated. Palette and glyphs are fixed;
/// only whether they apply is configurable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleContext {
    pub use_color: bool,
    pub use_icons: bool,
}

impl StyleContext {
    pub fn new(use_color: bool, use_icons: bool) -> Self {
        Self {
            use_color,
            use_icons,
        }
    }

    /// Color for the entry name, or `None` for the terminal default.
    pub fn name_color(&self, entry: &Entry) -> Option<ColorSpec> {
        if !self.use_color {
            return None;
        }
        let mut spec = ColorSpec::new();
        match entry.class() {
            FileClass::Directory => spec.set_fg(Some(Color::Blue)).set_bold(true),
            FileClass::Symlink => spec.set_fg(Some(Color::Cyan)),
            FileClass::Fifo => spec.set_fg(Some(Color::Yellow)),
            FileClass::Socket => spec.set_fg(Some(Color::Magenta)),
            FileClass::CharDevice | FileClass::BlockDevice => {
                spec.set_fg(Some(Color::Yellow)).set_bold(true)
            }
            FileClass::Regular if entry.type_indicator() == Some('*') => {
                spec.set_fg(Some(Color::Green)).set_bold(true)
            }
            FileClass::Regular | FileClass::Unknown => return None,
        };
        Some(spec)
    }

    pub fn git_color(&self, status: GitStatus) -> Option<ColorSpec> {
        if !self.use_color {
            return None;
        }
        let color = match status {
            GitStatus::Clean => return None,
            GitStatus::Added => Color::Green,
            GitStatus::Modified => Color::Yellow,
            GitStatus::Renamed => Color::Blue,
            GitStatus::TypeChange => Color::Magenta,
            GitStatus::Deleted | GitStatus::Conflicted | GitStatus::NotTracked => Color::Red,
            GitStatus::Ignored => Color::Black,
        };
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color))
            .set_intense(matches!(status, GitStatus::Ignored));
        Some(spec)
    }

    /// Nerd Font glyph shown before the name.
    pub fn icon(&self, entry: &Entry) -> Option<char> {
        if !self.use_icons {
            return None;
        }
        let glyph = match entry.class() {
            FileClass::Directory => '\u{f115}',
            FileClass::Symlink => '\u{f481}',
            FileClass::Regular if entry.type_indicator() == Some('*') => '\u{f489}',
            _ => '\u{f15b}',
        };
        Some(glyph)
    }

    /// Columns taken by the icon and its trailing space.
    pub fn icon_width(&self, entry: &Entry) -> usize {
        self.icon(entry)
            .map(|c| c.width().unwrap_or(1) + 1)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::EntryKind;

    #[test]
    fn test_no_color_means_no_specs() {
        let style = StyleContext::default();
        let dir = Entry::new("d", "d", EntryKind::Directory);
        assert!(style.name_color(&dir).is_none());
        assert!(style.git_color(GitStatus::Modified).is_none());
        assert!(style.icon(&dir).is_none());
        assert_eq!(style.icon_width(&dir), 0);
    }

    #[test]
    fn test_directory_is_bold_blue() {
        let style = StyleContext::new(true, false);
        let dir = Entry::new("d", "d", EntryKind::Directory);
        let spec = style.name_color(&dir).unwrap();
        assert_eq!(spec.fg(), Some(&Color::Blue));
        assert!(spec.bold());

        let plain = Entry::new("f", "f", EntryKind::File);
        assert!(style.name_color(&plain).is_none());
    }

    #[test]
    fn test_icons_take_two_columns() {
        let style = StyleContext::new(false, true);
        let file = Entry::new("f", "f", EntryKind::File);
        assert_eq!(style.icon(&file), Some('\u{f15b}'));
        assert_eq!(style.icon_width(&file), 2);
    }
}
