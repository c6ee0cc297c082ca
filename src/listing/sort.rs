//! Entry ordering

use std::cmp::Ordering;

use super::config::{SortConfig, SortKey};
use super::entry::Entry;

/// Stable multi-key ordering of one directory batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sorter {
    config: SortConfig,
}

impl Sorter {
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    /// The key actually used for `entries`. Time and size ordering require a
    /// stat on every entry; a batch with gaps is ordered by name instead.
    pub fn effective_key(&self, entries: &[Entry]) -> SortKey {
        let key = self.config.key();
        if key != SortKey::Name && entries.iter().any(|e| e.stat.is_none()) {
            tracing::debug!(?key, "metadata missing for some entries, sorting by name");
            return SortKey::Name;
        }
        key
    }

    pub fn sort(&self, entries: &mut [Entry]) {
        let key = self.effective_key(entries);
        entries.sort_by(|a, b| self.compare(a, b, key));
    }

    /// Directory grouping first, then the secondary ordering (possibly reversed).
    pub fn compare(&self, a: &Entry, b: &Entry, key: SortKey) -> Ordering {
        if self.config.directories_first {
            let (a_dir, b_dir) = (a.is_directory(), b.is_directory());
            if a_dir != b_dir {
                return b_dir.cmp(&a_dir);
            }
        }

        let ordering = compare_by_key(a, b, key);
        if self.config.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

fn compare_by_name(a: &Entry, b: &Entry) -> Ordering {
    a.name.as_bytes().cmp(b.name.as_bytes())
}

fn compare_by_key(a: &Entry, b: &Entry, key: SortKey) -> Ordering {
    let (sa, sb) = match (key, &a.stat, &b.stat) {
        (SortKey::Name, _, _) | (_, None, _) | (_, _, None) => return compare_by_name(a, b),
        (_, Some(sa), Some(sb)) => (sa, sb),
    };

    let primary = match key {
        // Newer first
        SortKey::Time => (sb.mtime, sb.mtime_nsec).cmp(&(sa.mtime, sa.mtime_nsec)),
        // Larger first
        SortKey::Size => sb.size.cmp(&sa.size),
        SortKey::Name => Ordering::Equal,
    };
    primary.then_with(|| compare_by_name(a, b))
}
