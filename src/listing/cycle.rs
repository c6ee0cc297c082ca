//! Visited-directory tracking for recursive listings

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use super::entry::FileSystemIdentity;

/// Physical directories already listed during one traversal.
#[derive(Debug, Default)]
pub struct CycleDetector {
    visited: HashSet<FileSystemIdentity>,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `directory` as visited. Returns `Ok(true)` if its identity was
    /// already present, in which case nothing is inserted. Symlinks are
    /// followed so a link and its target share one identity.
    pub fn check_and_mark_visited(&mut self, directory: &Path) -> io::Result<bool> {
        let metadata = fs::metadata(directory)?;
        Ok(self.check_and_mark(FileSystemIdentity::of(&metadata)))
    }

    /// Single check-and-insert step on an already computed identity.
    pub fn check_and_mark(&mut self, identity: FileSystemIdentity) -> bool {
        !self.visited.insert(identity)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn test_second_visit_is_a_cycle() {
        let dir = TempDir::new().unwrap();
        let mut detector = CycleDetector::new();
        assert!(!detector.check_and_mark_visited(dir.path()).unwrap());
        assert!(detector.check_and_mark_visited(dir.path()).unwrap());
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_symlink_shares_identity_with_target() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        symlink(&real, dir.path().join("alias")).unwrap();

        let mut detector = CycleDetector::new();
        assert!(!detector.check_and_mark_visited(&real).unwrap());
        assert!(detector.check_and_mark_visited(&dir.path().join("alias")).unwrap());
    }

    #[test]
    fn test_same_inode_on_other_device_is_distinct() {
        let mut detector = CycleDetector::new();
        assert!(!detector.check_and_mark(FileSystemIdentity { device: 1, inode: 42 }));
        assert!(!detector.check_and_mark(FileSystemIdentity { device: 2, inode: 42 }));
        assert!(detector.check_and_mark(FileSystemIdentity { device: 1, inode: 42 }));
        assert_eq!(detector.len(), 2);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut detector = CycleDetector::new();
        assert!(detector.check_and_mark_visited(&dir.path().join("gone")).is_err());
        assert!(detector.is_empty());
    }
}
