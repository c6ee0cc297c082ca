//! Batched metadata lookups for a collected directory
//!
//! Only the lookups the active features depend on are performed, each as a
//! single pass over the batch. Failures on one entry become diagnostics and the
//! entry keeps rendering with placeholders.

use std::fs;
use std::io;

use crate::diagnostics::Diagnostics;
use crate::error::ListingError;
use crate::git::StatusLookup;

use super::config::{ListingOptions, MetadataNeeds};
use super::entry::{Entry, EntryKind, FileClass, StatSnapshot};

pub struct MetadataEnhancer<'a> {
    needs: MetadataNeeds,
    dereference: bool,
    git: Option<&'a dyn StatusLookup>,
}

impl<'a> MetadataEnhancer<'a> {
    pub fn new(needs: MetadataNeeds) -> Self {
        Self {
            needs,
            dereference: false,
            git: None,
        }
    }

    pub fn from_options(options: &ListingOptions) -> Self {
        Self::new(options.metadata_needs()).with_dereference(options.dereference)
    }

    pub fn with_dereference(mut self, dereference: bool) -> Self {
        self.dereference = dereference;
        self
    }

    /// Attach a repository context. Without one, entries stay "not tracked".
    pub fn with_git(mut self, git: Option<&'a dyn StatusLookup>) -> Self {
        self.git = git;
        self
    }

    pub fn needs(&self) -> MetadataNeeds {
        self.needs
    }

    pub fn enhance(&self, entries: &mut [Entry], diagnostics: &mut Diagnostics<'_>) {
        if self.needs.stat {
            self.attach_stats(entries, diagnostics);
        }
        if self.needs.symlink_target {
            self.attach_symlink_targets(entries, diagnostics);
        }
        if self.needs.git_status {
            self.attach_git_status(entries);
        }
    }

    fn attach_stats(&self, entries: &mut [Entry], diagnostics: &mut Diagnostics<'_>) {
        let mut failed = 0usize;
        for entry in entries.iter_mut() {
            match self.stat(entry) {
                Ok(metadata) => entry.stat = Some(StatSnapshot::from_metadata(&metadata)),
                Err(e) => {
                    failed += 1;
                    diagnostics.error(&ListingError::metadata(&entry.path, e));
                }
            }
        }
        tracing::trace!(count = entries.len(), failed, "stat pass");
    }

    fn stat(&self, entry: &Entry) -> io::Result<fs::Metadata> {
        if self.dereference {
            // A dangling link still gets described by the link itself
            fs::metadata(&entry.path).or_else(|e| match entry.kind {
                EntryKind::Symlink => fs::symlink_metadata(&entry.path),
                _ => Err(e),
            })
        } else {
            fs::symlink_metadata(&entry.path)
        }
    }

    fn attach_symlink_targets(&self, entries: &mut [Entry], diagnostics: &mut Diagnostics<'_>) {
        // A dereferenced stat describes the target, so the row is no longer a link
        let described_as_link = |e: &Entry| {
            e.kind == EntryKind::Symlink
                && e.stat.as_ref().is_none_or(|s| s.class() == FileClass::Symlink)
        };
        for entry in entries.iter_mut().filter(|e| described_as_link(e)) {
            match fs::read_link(&entry.path) {
                Ok(target) => entry.symlink_target = Some(target.to_string_lossy().into_owned()),
                // EINVAL: the entry changed into something that is not a link
                Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
                Err(e) => diagnostics.error(&ListingError::metadata(&entry.path, e)),
            }
        }
    }

    fn attach_git_status(&self, entries: &mut [Entry]) {
        let Some(git) = self.git else {
            tracing::debug!("git status requested without a repository");
            return;
        };
        for entry in entries.iter_mut() {
            entry.git_status = git.status(&entry.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::GitStatus;
    use crate::listing::collector::EntryCollector;
    use std::collections::HashMap;
    use std::os::unix::fs::symlink;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn collect(dir: &TempDir) -> Vec<Entry> {
        EntryCollector::default().collect(dir.path()).unwrap()
    }

    #[test]
    fn test_no_needs_leaves_entries_untouched() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "abc").unwrap();
        let mut entries = collect(&dir);
        let mut diag = Diagnostics::sink();
        MetadataEnhancer::new(MetadataNeeds::default()).enhance(&mut entries, &mut diag);
        assert!(entries[0].stat.is_none());
        assert_eq!(diag.emitted(), 0);
    }

    #[test]
    fn test_stat_pass_fills_sizes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "abc").unwrap();
        let mut entries = collect(&dir);
        let mut diag = Diagnostics::sink();
        let needs = MetadataNeeds {
            stat: true,
            ..Default::default()
        };
        MetadataEnhancer::new(needs).enhance(&mut entries, &mut diag);
        assert_eq!(entries[0].stat.as_ref().unwrap().size, 3);
    }

    #[test]
    fn test_symlink_targets_only_for_links() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("target.txt"), "t").unwrap();
        symlink("target.txt", dir.path().join("link")).unwrap();
        let mut entries = collect(&dir);
        let mut diag = Diagnostics::sink();
        let needs = MetadataNeeds {
            stat: true,
            symlink_target: true,
            git_status: false,
        };
        MetadataEnhancer::new(needs).enhance(&mut entries, &mut diag);

        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert_eq!(link.symlink_target.as_deref(), Some("target.txt"));
        let target = entries.iter().find(|e| e.name == "target.txt").unwrap();
        assert!(target.symlink_target.is_none());
        assert_eq!(diag.emitted(), 0);
    }

    #[test]
    fn test_vanished_entry_is_reported_and_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keep.txt"), "k").unwrap();
        fs::write(dir.path().join("gone.txt"), "g").unwrap();
        let mut entries = collect(&dir);
        fs::remove_file(dir.path().join("gone.txt")).unwrap();

        let mut buf = Vec::new();
        {
            let mut diag = Diagnostics::new(&mut buf);
            let needs = MetadataNeeds {
                stat: true,
                ..Default::default()
            };
            MetadataEnhancer::new(needs).enhance(&mut entries, &mut diag);
            assert_eq!(diag.emitted(), 1);
        }

        let gone = entries.iter().find(|e| e.name == "gone.txt").unwrap();
        assert!(gone.stat.is_none());
        let keep = entries.iter().find(|e| e.name == "keep.txt").unwrap();
        assert!(keep.stat.is_some());
        assert!(String::from_utf8(buf).unwrap().contains("gone.txt"));
    }

    #[test]
    fn test_dereference_describes_target() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        symlink("real", dir.path().join("alias")).unwrap();
        symlink("missing", dir.path().join("dangling")).unwrap();
        let mut entries = collect(&dir);
        let mut diag = Diagnostics::sink();
        let needs = MetadataNeeds {
            stat: true,
            ..Default::default()
        };
        MetadataEnhancer::new(needs)
            .with_dereference(true)
            .enhance(&mut entries, &mut diag);

        let alias = entries.iter().find(|e| e.name == "alias").unwrap();
        assert!(alias.is_directory());
        let dangling = entries.iter().find(|e| e.name == "dangling").unwrap();
        assert!(dangling.stat.is_some());
        assert_eq!(diag.emitted(), 0);
    }

    #[test]
    fn test_dereferenced_links_drop_their_target() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("target.txt"), "t").unwrap();
        symlink("target.txt", dir.path().join("link")).unwrap();
        symlink("missing", dir.path().join("dangling")).unwrap();
        let mut entries = collect(&dir);
        let mut diag = Diagnostics::sink();
        let needs = MetadataNeeds {
            stat: true,
            symlink_target: true,
            git_status: false,
        };
        MetadataEnhancer::new(needs)
            .with_dereference(true)
            .enhance(&mut entries, &mut diag);

        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert_eq!(link.class(), FileClass::Regular);
        assert!(link.symlink_target.is_none());
        // Nothing to follow, so the dangling link is still shown as a link
        let dangling = entries.iter().find(|e| e.name == "dangling").unwrap();
        assert_eq!(dangling.class(), FileClass::Symlink);
        assert_eq!(dangling.symlink_target.as_deref(), Some("missing"));
        assert_eq!(diag.emitted(), 0);
    }

    #[test]
    fn test_git_lookup_is_keyed_by_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.rs"), "").unwrap();
        fs::write(dir.path().join("b.rs"), "").unwrap();
        let mut entries = collect(&dir);

        let mut statuses: HashMap<PathBuf, GitStatus> = HashMap::new();
        statuses.insert(dir.path().join("a.rs"), GitStatus::Modified);
        let needs = MetadataNeeds {
            git_status: true,
            ..Default::default()
        };
        let mut diag = Diagnostics::sink();
        MetadataEnhancer::new(needs)
            .with_git(Some(&statuses as &dyn StatusLookup))
            .enhance(&mut entries, &mut diag);

        let a = entries.iter().find(|e| e.name == "a.rs").unwrap();
        let b = entries.iter().find(|e| e.name == "b.rs").unwrap();
        assert_eq!(a.git_status, GitStatus::Modified);
        assert_eq!(b.git_status, GitStatus::NotTracked);
    }

    #[test]
    fn test_missing_git_context_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.rs"), "").unwrap();
        let mut entries = collect(&dir);
        let needs = MetadataNeeds {
            git_status: true,
            ..Default::default()
        };
        let mut diag = Diagnostics::sink();
        MetadataEnhancer::new(needs).enhance(&mut entries, &mut diag);
        assert_eq!(entries[0].git_status, GitStatus::NotTracked);
        assert_eq!(diag.emitted(), 0);
    }
}
