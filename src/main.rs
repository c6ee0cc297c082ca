//! CLI entry point for peel

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use peel::listing::{ListingOptions, RecursionEngine, TimeStyle, When};
use peel::output::{Formatter, OutputConfig};
use peel::{Diagnostics, GitContext, ListingError, StatusLookup};
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

const DEFAULT_WIDTH: usize = 80;

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: When) -> bool {
    match mode {
        When::Always => true,
        When::Never => false,
        When::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

/// Icons only make sense on a terminal that can draw them.
fn should_use_icons(mode: When) -> bool {
    match mode {
        When::Always => true,
        When::Never => false,
        When::Auto => {
            !std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false)
                && io::stdout().is_terminal()
        }
    }
}

/// `--width`, then `COLUMNS`, then the terminal size, then 80.
fn terminal_width(requested: Option<usize>) -> usize {
    if let Some(width) = requested.filter(|w| *w > 0) {
        return width;
    }
    if let Some(width) = std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.trim().parse::<usize>().ok())
        .filter(|w| *w > 0)
    {
        return width;
    }
    if io::stdout().is_terminal() {
        if let Ok((cols, _)) = crossterm::terminal::size() {
            if cols > 0 {
                return cols as usize;
            }
        }
    }
    DEFAULT_WIDTH
}

#[derive(Parser, Debug)]
#[command(name = "peel")]
#[command(about = "List directory contents, with git status, icons and cycle-safe recursion")]
#[command(version, disable_help_flag = true)]
struct Args {
    /// Files or directories to list
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Do not ignore entries starting with .
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Like -a, but without . and ..
    #[arg(short = 'A', long = "almost-all")]
    almost_all: bool,

    /// Use a long listing format
    #[arg(short = 'l')]
    long: bool,

    /// With -l, print sizes like 1K 234M 2G
    #[arg(short = 'h', long = "human-readable")]
    human_readable: bool,

    /// With -l, print sizes in kilobytes
    #[arg(short = 'k', long = "kibibytes")]
    kilobytes: bool,

    /// List one file per line
    #[arg(short = '1')]
    one_per_line: bool,

    /// List directories themselves, not their contents
    #[arg(short = 'd', long = "directory")]
    directory: bool,

    /// List subdirectories recursively
    #[arg(short = 'R', long = "recursive")]
    recursive: bool,

    /// Sort by modification time, newest first
    #[arg(short = 't')]
    sort_time: bool,

    /// Sort by file size, largest first
    #[arg(short = 'S')]
    sort_size: bool,

    /// Reverse order while sorting
    #[arg(short = 'r', long = "reverse")]
    reverse: bool,

    /// Append indicator (one of */=@|) to entries
    #[arg(short = 'F', long = "classify")]
    classify: bool,

    /// Print the index number of each file
    #[arg(short = 'i', long = "inode")]
    inode: bool,

    /// Like -l, but list numeric user and group IDs
    #[arg(short = 'n', long = "numeric-uid-gid")]
    numeric: bool,

    /// Comma separated list of entries
    #[arg(short = 'm')]
    comma: bool,

    /// Do not list entries matching the glob PATTERN (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Follow symbolic links for metadata and recursion
    #[arg(short = 'L', long = "dereference")]
    dereference: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: When,

    /// Control icons: auto, always, never
    #[arg(long = "icons", value_name = "WHEN", default_value = "auto")]
    icons: When,

    /// Timestamp format in long listings: relative, iso, long-iso
    #[arg(long = "time-style", value_name = "STYLE", default_value = "relative")]
    time_style: TimeStyle,

    /// Group directories before files
    #[arg(long = "group-directories-first")]
    group_directories_first: bool,

    /// Show git status next to each entry
    #[arg(long = "git")]
    git: bool,

    /// Output each directory as a JSON array
    #[arg(long = "json")]
    json: bool,

    /// Assume screen width COLS instead of detecting it
    #[arg(short = 'w', long = "width", value_name = "COLS")]
    width: Option<usize>,
}

impl Args {
    fn listing_options(&self) -> ListingOptions {
        ListingOptions {
            show_hidden: self.all,
            show_almost_all: self.almost_all,
            long_format: self.long || self.numeric,
            human_readable: self.human_readable,
            kilobytes: self.kilobytes,
            one_per_line: self.one_per_line,
            directory_only: self.directory,
            recursive: self.recursive && !self.directory,
            sort_by_time: self.sort_time,
            sort_by_size: self.sort_size,
            reverse: self.reverse,
            type_indicators: self.classify,
            color: self.color,
            group_directories_first: self.group_directories_first,
            show_inodes: self.inode,
            numeric_ids: self.numeric,
            comma_format: self.comma,
            icons: self.icons,
            time_style: self.time_style,
            show_git_status: self.git,
            ignore_patterns: self.ignore.clone(),
            dereference: self.dereference,
            json: self.json,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PEEL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    init_logging();
    let args = Args::parse();
    let options = args.listing_options();

    let use_color = should_use_color(options.color);
    let use_icons = should_use_icons(options.icons);
    let width = terminal_width(args.width);
    tracing::debug!(use_color, use_icons, width, "resolved output settings");

    let git = if options.show_git_status {
        let context = args.paths.first().and_then(|p| GitContext::discover(p));
        if context.is_none() {
            tracing::warn!("not a git repository, git status unavailable");
        }
        context
    } else {
        None
    };

    let formatter = Formatter::new(OutputConfig::from_options(&options, use_color, use_icons, width));
    let mut engine = RecursionEngine::new(options, formatter)
        .with_git(git.as_ref().map(|g| g as &dyn StatusLookup));

    let choice = if use_color {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    let mut diagnostics = Diagnostics::stderr();

    let result = engine
        .list_paths(&args.paths, &mut stdout, &mut diagnostics)
        .and_then(|()| stdout.flush().map_err(ListingError::from));

    match result {
        Ok(()) => process::exit(diagnostics.exit_code()),
        // The reader went away; nothing left to say.
        Err(ListingError::BrokenPipe) => process::exit(diagnostics.exit_code()),
        Err(e) => {
            diagnostics.report(peel::Severity::Serious, &e);
            process::exit(2);
        }
    }
}
