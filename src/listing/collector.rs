//! Directory enumeration and name filtering

use std::fs;
use std::path::Path;

use glob::Pattern;

use crate::error::{ListingError, Result};

use super::config::{FilterConfig, ListingOptions};
use super::entry::{Entry, EntryKind};

/// A user-supplied ignore pattern. Patterns that do not compile as globs
/// still match names literally.
#[derive(Debug, Clone)]
struct IgnorePattern {
    raw: String,
    glob: Option<Pattern>,
}

impl IgnorePattern {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            glob: Pattern::new(raw).ok(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        name == self.raw || self.glob.as_ref().is_some_and(|p| p.matches(name))
    }
}

/// Enumerates one directory into an owned, unsorted batch of entries.
#[derive(Debug, Clone, Default)]
pub struct EntryCollector {
    filter: FilterConfig,
    ignore: Vec<IgnorePattern>,
}

impl EntryCollector {
    pub fn new(filter: FilterConfig) -> Self {
        Self {
            filter,
            ignore: Vec::new(),
        }
    }

    pub fn from_options(options: &ListingOptions) -> Self {
        Self::new(options.filter()).with_ignore_patterns(&options.ignore_patterns)
    }

    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore = patterns.iter().map(|p| IgnorePattern::new(p)).collect();
        self
    }

    /// Whether a name survives the hidden-file rule and ignore patterns.
    pub fn is_included(&self, name: &str) -> bool {
        if (name == "." || name == "..") && self.filter.skip_dot_entries {
            return false;
        }
        if name.starts_with('.') && !self.filter.show_hidden && !self.filter.show_all {
            return false;
        }
        !self.ignore.iter().any(|p| p.matches(name))
    }

    /// Read every member of `dir`. Any failure to open or iterate the
    /// directory fails the whole batch.
    pub fn collect(&self, dir: &Path) -> Result<Vec<Entry>> {
        let read_dir = fs::read_dir(dir).map_err(|e| ListingError::enumeration(dir, e))?;

        let mut entries = Vec::new();

        // read_dir never yields the dot entries, so synthesise them for -a
        for dot in [".", ".."] {
            if self.is_included(dot) {
                entries.push(Entry::new(dot, dir.join(dot), EntryKind::Directory));
            }
        }

        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|e| ListingError::enumeration(dir, e))?;
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            if !self.is_included(&name) {
                continue;
            }
            let entry = match dir_entry.file_type() {
                Ok(ft) => Entry::from_file_type(name, dir_entry.path(), ft),
                Err(_) => Entry::new(name, dir_entry.path(), EntryKind::Other),
            };
            entries.push(entry);
        }

        tracing::trace!(dir = %dir.display(), count = entries.len(), "collected entries");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn names(entries: &[Entry]) -> BTreeSet<String> {
        entries.iter().map(|e| e.name.clone()).collect()
    }

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("visible.txt"), "v").unwrap();
        fs::write(dir.path().join(".hidden"), "h").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        dir
    }

    #[test]
    fn test_default_hides_dotfiles() {
        let dir = setup();
        let collector = EntryCollector::from_options(&ListingOptions::default());
        let entries = collector.collect(dir.path()).unwrap();
        assert_eq!(names(&entries), BTreeSet::from(["sub".to_string(), "visible.txt".to_string()]));
    }

    #[test]
    fn test_show_all_includes_dot_entries() {
        let dir = setup();
        let options = ListingOptions {
            show_hidden: true,
            ..Default::default()
        };
        let entries = EntryCollector::from_options(&options).collect(dir.path()).unwrap();
        let found = names(&entries);
        for expected in [".", "..", ".hidden", "visible.txt", "sub"] {
            assert!(found.contains(expected), "missing {expected}");
        }
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn test_almost_all_skips_dot_entries() {
        let dir = setup();
        let options = ListingOptions {
            show_almost_all: true,
            ..Default::default()
        };
        let entries = EntryCollector::from_options(&options).collect(dir.path()).unwrap();
        let found = names(&entries);
        assert!(found.contains(".hidden"));
        assert!(!found.contains("."));
        assert!(!found.contains(".."));
    }

    #[test]
    fn test_skip_dot_entries_overrides_show_all() {
        let collector = EntryCollector::new(FilterConfig {
            show_hidden: true,
            show_all: true,
            skip_dot_entries: true,
        });
        assert!(!collector.is_included("."));
        assert!(!collector.is_included(".."));
        assert!(collector.is_included(".git"));
    }

    #[test]
    fn test_kinds_are_populated() {
        let dir = setup();
        let entries = EntryCollector::default().collect(dir.path()).unwrap();
        let sub = entries.iter().find(|e| e.name == "sub").unwrap();
        assert_eq!(sub.kind, EntryKind::Directory);
        let file = entries.iter().find(|e| e.name == "visible.txt").unwrap();
        assert_eq!(file.kind, EntryKind::File);
        assert!(file.stat.is_none());
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = setup();
        fs::write(dir.path().join("debug.log"), "").unwrap();
        let options = ListingOptions {
            ignore_patterns: vec!["*.log".to_string(), "sub".to_string()],
            ..Default::default()
        };
        let entries = EntryCollector::from_options(&options).collect(dir.path()).unwrap();
        assert_eq!(names(&entries), BTreeSet::from(["visible.txt".to_string()]));
    }

    #[test]
    fn test_missing_directory_is_an_enumeration_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        let err = EntryCollector::default().collect(&missing).unwrap_err();
        assert!(matches!(err, ListingError::Enumeration { .. }));
        assert_eq!(err.path(), Some(missing.as_path()));
    }
}
