//! Output configuration types

use crate::listing::{Layout, ListingOptions, SizeStyle, TimeStyle};

const DEFAULT_WIDTH: usize = 80;

/// Space between columns in the grid layout.
pub const COLUMN_PADDING: usize = 2;

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub layout: Layout,
    pub use_color: bool,
    pub use_icons: bool,
    /// Terminal width in columns
    pub width: usize,
    pub size_style: SizeStyle,
    pub time_style: TimeStyle,
    pub show_inodes: bool,
    pub numeric_ids: bool,
    pub type_indicators: bool,
    pub show_git_status: bool,
}

impl OutputConfig {
    /// Output settings for `options`, with color, icons and width already
    /// resolved by the caller.
    pub fn from_options(options: &ListingOptions, use_color: bool, use_icons: bool, width: usize) -> Self {
        Self {
            layout: options.layout(),
            use_color,
            use_icons,
            width,
            size_style: options.size_style(),
            time_style: options.time_style,
            show_inodes: options.show_inodes,
            numeric_ids: options.numeric_ids,
            type_indicators: options.type_indicators,
            show_git_status: options.show_git_status,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Columns,
            use_color: false,
            use_icons: false,
            width: DEFAULT_WIDTH,
            size_style: SizeStyle::Bytes,
            time_style: TimeStyle::Relative,
            show_inodes: false,
            numeric_ids: false,
            type_indicators: false,
            show_git_status: false,
        }
    }
}
