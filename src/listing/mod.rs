//! Directory listing pipeline
//!
//! Each directory is processed as one batch by four stages:
//!
//! - `EntryCollector`: Reads the directory and applies visibility filtering
//! - `MetadataEnhancer`: Attaches stat data, symlink targets and git status
//! - `Sorter`: Orders the batch by name, time or size
//! - `Formatter` (in `crate::output`): Renders the batch
//!
//! `RecursionEngine` drives the stages per directory and walks
//! subdirectories depth-first, using `CycleDetector` to skip directories
//! it has already listed.

mod collector;
mod config;
mod cycle;
mod engine;
mod enhancer;
mod entry;
mod sort;

pub use collector::EntryCollector;
pub use config::{
    FilterConfig, Layout, ListingOptions, MetadataNeeds, SizeStyle, SortConfig, SortKey, TimeStyle,
    When,
};
pub use cycle::CycleDetector;
pub use engine::RecursionEngine;
pub use enhancer::MetadataEnhancer;
pub use entry::{Entry, EntryKind, FileClass, FileSystemIdentity, StatSnapshot};
pub use sort::Sorter;
