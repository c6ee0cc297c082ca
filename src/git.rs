//! Git repository integration

use git2::{Repository, Status, StatusOptions};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-file git state shown next to entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GitStatus {
    /// Not known to the repository, or no repository at all
    #[default]
    NotTracked,
    Clean,
    Added,
    Modified,
    Deleted,
    Renamed,
    TypeChange,
    Ignored,
    Conflicted,
}

impl GitStatus {
    fn from_flags(flags: Status) -> Self {
        if flags.is_conflicted() {
            GitStatus::Conflicted
        } else if flags.contains(Status::IGNORED) {
            GitStatus::Ignored
        } else if flags.contains(Status::WT_NEW) {
            GitStatus::NotTracked
        } else if flags.contains(Status::INDEX_NEW) {
            GitStatus::Added
        } else if flags.intersects(Status::WT_DELETED | Status::INDEX_DELETED) {
            GitStatus::Deleted
        } else if flags.intersects(Status::WT_RENAMED | Status::INDEX_RENAMED) {
            GitStatus::Renamed
        } else if flags.intersects(Status::WT_TYPECHANGE | Status::INDEX_TYPECHANGE) {
            GitStatus::TypeChange
        } else if flags.intersects(Status::WT_MODIFIED | Status::INDEX_MODIFIED) {
            GitStatus::Modified
        } else {
            GitStatus::Clean
        }
    }

    /// Single-character indicator column.
    pub fn indicator(&self) -> char {
        match self {
            GitStatus::NotTracked => '?',
            GitStatus::Clean => ' ',
            GitStatus::Added => 'A',
            GitStatus::Modified => 'M',
            GitStatus::Deleted => 'D',
            GitStatus::Renamed => 'R',
            GitStatus::TypeChange => 'T',
            GitStatus::Ignored => '!',
            GitStatus::Conflicted => 'U',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GitStatus::NotTracked => "not-tracked",
            GitStatus::Clean => "clean",
            GitStatus::Added => "added",
            GitStatus::Modified => "modified",
            GitStatus::Deleted => "deleted",
            GitStatus::Renamed => "renamed",
            GitStatus::TypeChange => "typechange",
            GitStatus::Ignored => "ignored",
            GitStatus::Conflicted => "conflicted",
        }
    }

    /// Rank used when a directory summarises its contents.
    fn weight(&self) -> u8 {
        match self {
            GitStatus::NotTracked | GitStatus::Ignored => 0,
            GitStatus::Clean => 1,
            GitStatus::Renamed | GitStatus::TypeChange => 2,
            GitStatus::Deleted => 3,
            GitStatus::Added => 4,
            GitStatus::Modified => 5,
            GitStatus::Conflicted => 6,
        }
    }
}

/// Key-based status lookup consumed by the metadata enhancer.
pub trait StatusLookup {
    fn status(&self, path: &Path) -> GitStatus;
}

/// Snapshot of a repository's statuses, taken once when opened.
pub struct GitContext {
    statuses: HashMap<PathBuf, GitStatus>,
    /// Most significant status below each directory
    dir_summaries: HashMap<PathBuf, GitStatus>,
    repo_root: PathBuf,
}

impl GitContext {
    /// Discover the repository containing `path`. Returns `None` outside a
    /// repository or for bare repositories.
    pub fn discover(path: &Path) -> Option<Self> {
        let repo = Repository::discover(path).ok()?;
        let workdir = repo.workdir()?;
        let repo_root = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
        let statuses = Self::collect_statuses(&repo, &repo_root)?;
        let dir_summaries = Self::summarize_directories(&statuses, &repo_root);
        tracing::debug!(
            root = %repo_root.display(),
            files = statuses.len(),
            dirs = dir_summaries.len(),
            "opened git repository"
        );

        Some(Self {
            statuses,
            dir_summaries,
            repo_root,
        })
    }

    fn collect_statuses(repo: &Repository, repo_root: &Path) -> Option<HashMap<PathBuf, GitStatus>> {
        let mut statuses = HashMap::new();

        // Everything in the index starts out clean
        let index = repo.index().ok()?;
        for entry in index.iter() {
            let path_str = String::from_utf8_lossy(&entry.path);
            statuses.insert(repo_root.join(path_str.as_ref()), GitStatus::Clean);
        }

        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(true)
            .recurse_ignored_dirs(false);
        for entry in repo.statuses(Some(&mut options)).ok()?.iter() {
            if let Some(path) = entry.path() {
                let path = path.trim_end_matches('/');
                statuses.insert(repo_root.join(path), GitStatus::from_flags(entry.status()));
            }
        }

        Some(statuses)
    }

    /// Fold every file status into each of its ancestor directories, keeping
    /// the heaviest.
    fn summarize_directories(
        statuses: &HashMap<PathBuf, GitStatus>,
        repo_root: &Path,
    ) -> HashMap<PathBuf, GitStatus> {
        let mut summaries: HashMap<PathBuf, GitStatus> = HashMap::new();
        for (path, status) in statuses {
            for dir in path.ancestors().skip(1) {
                if !dir.starts_with(repo_root) {
                    break;
                }
                let summary = summaries.entry(dir.to_path_buf()).or_default();
                if status.weight() > summary.weight() {
                    *summary = *status;
                }
            }
        }
        summaries
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Absolute key for `path` without following a symlink at the final
    /// component.
    fn key_for(path: &Path) -> Option<PathBuf> {
        let Some(name) = path.file_name() else {
            // `..` and the filesystem root have no name of their own
            return path.canonicalize().ok();
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Some(parent.canonicalize().ok()?.join(name))
    }
}

impl StatusLookup for GitContext {
    fn status(&self, path: &Path) -> GitStatus {
        let Some(key) = Self::key_for(path) else {
            return GitStatus::NotTracked;
        };

        if let Some(status) = self.statuses.get(&key) {
            return *status;
        }

        if !key.starts_with(&self.repo_root) {
            return GitStatus::NotTracked;
        }

        // Symlinks to directories keep their own (missing) entry
        if fs::symlink_metadata(&key).is_ok_and(|m| m.is_dir()) {
            return self.dir_summaries.get(&key).copied().unwrap_or_default();
        }

        GitStatus::NotTracked
    }
}

impl StatusLookup for HashMap<PathBuf, GitStatus> {
    fn status(&self, path: &Path) -> GitStatus {
        self.get(path).copied().unwrap_or_default()
    }
}
