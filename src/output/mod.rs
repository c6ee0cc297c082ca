//! Listing formatting and display
//!
//! This module renders one directory batch at a time in one of the layouts:
//! - Columns (default), column-major and sized to the terminal width
//! - One entry per line
//! - Comma separated
//! - Long format with permissions, owners, sizes and timestamps
//! - JSON
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `style` - Color, icon and git indicator decoration
//! - `utils` - Field rendering (permissions, sizes, timestamps)
//! - `formatter` - Layout dispatch and name rendering
//! - `grid` - Columns, one-per-line and comma layouts
//! - `long` - Long layout
//! - `json` - JSON layout

mod config;
mod formatter;
mod grid;
mod json;
mod long;
mod style;
mod utils;

pub use config::{COLUMN_PADDING, OutputConfig};
pub use formatter::Formatter;
pub use grid::column_count;
pub use json::JsonEntry;
pub use long::total_blocks;
pub use style::StyleContext;
pub use utils::{format_size, permission_string, relative_time};
