//! Peel - ls with git status, icons and a cycle-safe recursive walk

pub mod diagnostics;
pub mod error;
pub mod git;
pub mod listing;
pub mod output;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use diagnostics::{Diagnostics, Severity};
pub use error::{ListingError, Result};
pub use git::{GitContext, GitStatus, StatusLookup};
pub use listing::{
    CycleDetector, Entry, EntryCollector, EntryKind, ListingOptions, MetadataEnhancer,
    RecursionEngine, Sorter, When,
};
pub use output::{Formatter, OutputConfig};
