//! Directory entries and their optional metadata

use std::cell::OnceCell;
use std::fs::{FileType, Metadata};
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::git::GitStatus;

const S_IFMT: u32 = 0o170_000;
const S_IFSOCK: u32 = 0o140_000;
const S_IFLNK: u32 = 0o120_000;
const S_IFREG: u32 = 0o100_000;
const S_IFBLK: u32 = 0o060_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFCHR: u32 = 0o020_000;
const S_IFIFO: u32 = 0o010_000;

/// What a directory member is, as reported by the enumerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryKind {
    pub fn from_file_type(ft: FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symlink",
            EntryKind::Other => "other",
        }
    }
}

/// Finer file type, derived from mode bits when a stat is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Regular,
    Directory,
    Symlink,
    Fifo,
    Socket,
    CharDevice,
    BlockDevice,
    Unknown,
}

impl FileClass {
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => FileClass::Regular,
            S_IFDIR => FileClass::Directory,
            S_IFLNK => FileClass::Symlink,
            S_IFIFO => FileClass::Fifo,
            S_IFSOCK => FileClass::Socket,
            S_IFCHR => FileClass::CharDevice,
            S_IFBLK => FileClass::BlockDevice,
            _ => FileClass::Unknown,
        }
    }

    fn from_file_type(ft: FileType) -> Self {
        if ft.is_symlink() {
            FileClass::Symlink
        } else if ft.is_dir() {
            FileClass::Directory
        } else if ft.is_file() {
            FileClass::Regular
        } else if ft.is_fifo() {
            FileClass::Fifo
        } else if ft.is_socket() {
            FileClass::Socket
        } else if ft.is_char_device() {
            FileClass::CharDevice
        } else if ft.is_block_device() {
            FileClass::BlockDevice
        } else {
            FileClass::Unknown
        }
    }

    /// First character of the long-format permission string.
    pub fn type_char(&self) -> char {
        match self {
            FileClass::Regular => '-',
            FileClass::Directory => 'd',
            FileClass::Symlink => 'l',
            FileClass::Fifo => 'p',
            FileClass::Socket => 's',
            FileClass::CharDevice => 'c',
            FileClass::BlockDevice => 'b',
            FileClass::Unknown => '?',
        }
    }
}

impl From<EntryKind> for FileClass {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::File => FileClass::Regular,
            EntryKind::Directory => FileClass::Directory,
            EntryKind::Symlink => FileClass::Symlink,
            EntryKind::Other => FileClass::Unknown,
        }
    }
}

/// (device, inode) pair identifying a physical directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileSystemIdentity {
    pub device: u64,
    pub inode: u64,
}

impl FileSystemIdentity {
    pub fn of(metadata: &Metadata) -> Self {
        Self {
            device: metadata.dev(),
            inode: metadata.ino(),
        }
    }
}

/// The subset of stat(2) the formatters and sorter use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatSnapshot {
    pub size: u64,
    pub mtime: i64,
    pub mtime_nsec: i64,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub device: u64,
    pub inode: u64,
    pub nlink: u64,
    pub blocks: u64,
}

impl StatSnapshot {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            size: metadata.size(),
            mtime: metadata.mtime(),
            mtime_nsec: metadata.mtime_nsec(),
            mode: metadata.mode(),
            uid: metadata.uid(),
            gid: metadata.gid(),
            device: metadata.dev(),
            inode: metadata.ino(),
            nlink: metadata.nlink(),
            blocks: metadata.blocks(),
        }
    }

    pub fn class(&self) -> FileClass {
        FileClass::from_mode(self.mode)
    }

    pub fn identity(&self) -> FileSystemIdentity {
        FileSystemIdentity {
            device: self.device,
            inode: self.inode,
        }
    }

    /// Modification time as a UTC instant, if representable.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        let nanos = u32::try_from(self.mtime_nsec).unwrap_or(0);
        DateTime::from_timestamp(self.mtime, nanos)
    }

    /// Number of 512-byte blocks the long-format total line counts.
    pub fn size_blocks(&self) -> u64 {
        self.size.div_ceil(512)
    }

    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

/// One named directory member plus whatever metadata was looked up for it.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub stat: Option<StatSnapshot>,
    pub symlink_target: Option<String>,
    pub git_status: GitStatus,
    class_hint: Option<FileClass>,
    display_width: OnceCell<usize>,
    indicator: OnceCell<Option<char>>,
}

impl Entry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            stat: None,
            symlink_target: None,
            git_status: GitStatus::default(),
            class_hint: None,
            display_width: OnceCell::new(),
            indicator: OnceCell::new(),
        }
    }

    /// Build an entry from the enumerator's file type, keeping the finer class
    /// so fifos and sockets are recognisable without a stat.
    pub fn from_file_type(name: impl Into<String>, path: impl Into<PathBuf>, ft: FileType) -> Self {
        let mut entry = Self::new(name, path, EntryKind::from_file_type(ft));
        entry.class_hint = Some(FileClass::from_file_type(ft));
        entry
    }

    pub fn with_stat(mut self, stat: StatSnapshot) -> Self {
        self.stat = Some(stat);
        self
    }

    /// File class from stat when present, otherwise from the enumerator.
    pub fn class(&self) -> FileClass {
        match &self.stat {
            Some(stat) => stat.class(),
            None => self.class_hint.unwrap_or_else(|| self.kind.into()),
        }
    }

    /// Directory-ness used for grouping and recursion. A dereferenced
    /// symlink to a directory counts as a directory.
    pub fn is_directory(&self) -> bool {
        self.class() == FileClass::Directory
    }

    pub fn is_dot_entry(&self) -> bool {
        self.name == "." || self.name == ".."
    }

    /// The `-F` suffix, computed once per entry.
    pub fn type_indicator(&self) -> Option<char> {
        *self.indicator.get_or_init(|| match self.class() {
            FileClass::Directory => Some('/'),
            FileClass::Symlink => Some('@'),
            FileClass::Fifo => Some('|'),
            FileClass::Socket => Some('='),
            FileClass::Regular if self.stat.as_ref().is_some_and(StatSnapshot::is_executable) => {
                Some('*')
            }
            _ => None,
        })
    }

    /// Cached display width; the first caller's computation wins.
    pub fn display_width(&self, compute: impl FnOnce(&Entry) -> usize) -> usize {
        *self.display_width.get_or_init(|| compute(self))
    }
}
