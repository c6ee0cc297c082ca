//! Configuration types for a listing invocation

use clap::ValueEnum;

/// Tri-state switch for color and icon output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum When {
    Always,
    /// Decided by the CLI layer from the terminal and environment
    #[default]
    Auto,
    Never,
}

/// How timestamps are rendered in long format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeStyle {
    /// "3 hours ago"
    #[default]
    Relative,
    /// 2024-05-01 14:03
    Iso,
    /// 2024-05-01 14:03:27.123456789 +0200
    LongIso,
}

/// How sizes are rendered in long format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeStyle {
    #[default]
    Bytes,
    Human,
    Kilobytes,
}

/// Output layout, resolved from the mutually exclusive layout flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Columns,
    OnePerLine,
    Long,
    Comma,
    Json,
}

/// Primary sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Time,
    Size,
}

/// Immutable snapshot of every user-visible flag for one listing.
#[derive(Debug, Clone, Default)]
pub struct ListingOptions {
    /// -a: show dotfiles, including `.` and `..`
    pub show_hidden: bool,
    /// -A: show dotfiles except `.` and `..`
    pub show_almost_all: bool,
    pub long_format: bool,
    pub human_readable: bool,
    pub kilobytes: bool,
    pub one_per_line: bool,
    /// -d: list operands themselves, not their contents
    pub directory_only: bool,
    pub recursive: bool,
    pub sort_by_time: bool,
    pub sort_by_size: bool,
    pub reverse: bool,
    /// -F: append `/`, `@`, `*`, `|` or `=`
    pub type_indicators: bool,
    pub color: When,
    pub group_directories_first: bool,
    pub show_inodes: bool,
    pub numeric_ids: bool,
    pub comma_format: bool,
    pub icons: When,
    pub time_style: TimeStyle,
    pub show_git_status: bool,
    /// Glob patterns for names that are never listed (-I)
    pub ignore_patterns: Vec<String>,
    /// -L: follow symlinks for metadata and recursion
    pub dereference: bool,
    pub json: bool,
}

/// Filter applied while enumerating a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterConfig {
    pub show_hidden: bool,
    pub show_all: bool,
    /// `.` and `..` are never listed when set
    pub skip_dot_entries: bool,
}

/// The four sort flags, recomputed per listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortConfig {
    pub directories_first: bool,
    pub by_time: bool,
    pub by_size: bool,
    pub reverse: bool,
}

impl SortConfig {
    /// Time wins when both time and size are requested.
    pub fn key(&self) -> SortKey {
        if self.by_time {
            SortKey::Time
        } else if self.by_size {
            SortKey::Size
        } else {
            SortKey::Name
        }
    }
}

/// Which lookups the enhancer has to perform for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetadataNeeds {
    pub stat: bool,
    pub symlink_target: bool,
    pub git_status: bool,
}

impl MetadataNeeds {
    pub fn any(&self) -> bool {
        self.stat || self.symlink_target || self.git_status
    }
}

impl ListingOptions {
    pub fn filter(&self) -> FilterConfig {
        FilterConfig {
            show_hidden: self.show_hidden || self.show_almost_all,
            show_all: self.show_hidden,
            skip_dot_entries: !self.show_hidden,
        }
    }

    pub fn sort_config(&self) -> SortConfig {
        SortConfig {
            directories_first: self.group_directories_first,
            by_time: self.sort_by_time,
            by_size: self.sort_by_size,
            reverse: self.reverse,
        }
    }

    pub fn layout(&self) -> Layout {
        if self.long_format {
            Layout::Long
        } else if self.json {
            Layout::Json
        } else if self.comma_format {
            Layout::Comma
        } else if self.one_per_line {
            Layout::OnePerLine
        } else {
            Layout::Columns
        }
    }

    pub fn size_style(&self) -> SizeStyle {
        if self.human_readable {
            SizeStyle::Human
        } else if self.kilobytes {
            SizeStyle::Kilobytes
        } else {
            SizeStyle::Bytes
        }
    }

    /// The minimal set of lookups the requested features depend on.
    pub fn metadata_needs(&self) -> MetadataNeeds {
        let layout = self.layout();
        let detailed = matches!(layout, Layout::Long | Layout::Json);
        let stat = detailed
            || self.sort_by_time
            || self.sort_by_size
            || self.type_indicators
            || self.color != When::Never
            || self.show_inodes;
        MetadataNeeds {
            stat,
            symlink_target: detailed,
            git_status: self.show_git_status,
        }
    }
}
