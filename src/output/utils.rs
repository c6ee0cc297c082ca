//! Shared field rendering for the output layouts

use std::time::Duration;

use chrono::{DateTime, Local, Utc};

use crate::listing::{Entry, FileClass, SizeStyle, StatSnapshot, TimeStyle};

/// Placeholder printed for any field whose stat is missing.
pub const PLACEHOLDER: &str = "?";

/// `drwxr-xr-x`-style permission string.
pub fn permission_string(class: FileClass, mode: u32) -> String {
    let mut perms = String::with_capacity(10);
    perms.push(class.type_char());

    let triads = [
        (0o400, 0o200, 0o100, 0o4000, 's'),
        (0o040, 0o020, 0o010, 0o2000, 's'),
        (0o004, 0o002, 0o001, 0o1000, 't'),
    ];
    for (read, write, exec, special, special_char) in triads {
        perms.push(if mode & read != 0 { 'r' } else { '-' });
        perms.push(if mode & write != 0 { 'w' } else { '-' });
        let executable = mode & exec != 0;
        perms.push(match (mode & special != 0, executable) {
            (true, true) => special_char,
            (true, false) => special_char.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    perms
}

/// Permission string for an entry, with `?` for the bits when stat is missing.
pub fn entry_permissions(entry: &Entry) -> String {
    match &entry.stat {
        Some(stat) => permission_string(entry.class(), stat.mode),
        None => format!("{}?????????", entry.class().type_char()),
    }
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [char; 5] = ['K', 'M', 'G', 'T', 'P'];

    if bytes < 1024 {
        return bytes.to_string();
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    loop {
        // Round before choosing the unit so 1023.9K becomes 1.0M, not 1024K
        let rounded = if value < 10.0 {
            (value * 10.0).round() / 10.0
        } else {
            value.round()
        };
        if rounded >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
            continue;
        }
        return if rounded < 10.0 {
            format!("{:.1}{}", rounded, UNITS[unit])
        } else {
            format!("{:.0}{}", rounded, UNITS[unit])
        };
    }
}

pub fn render_size(stat: Option<&StatSnapshot>, style: SizeStyle) -> String {
    let Some(stat) = stat else {
        return PLACEHOLDER.to_string();
    };
    match style {
        SizeStyle::Bytes => stat.size.to_string(),
        SizeStyle::Human => format_size(stat.size),
        SizeStyle::Kilobytes => format!("{}K", stat.size.div_ceil(1024)),
    }
}

/// "3h ago"-style phrase rounded down to the largest whole unit.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const UNITS: [u64; 6] = [31_557_600, 2_630_016, 86_400, 3_600, 60, 1];

    let delta = now.signed_duration_since(then).num_seconds();
    if delta < 0 {
        return "in the future".to_string();
    }
    let secs = delta as u64;
    let rounded = UNITS
        .iter()
        .find(|&&unit| secs >= unit)
        .map(|&unit| secs / unit * unit)
        .unwrap_or(0);
    format!("{} ago", humantime::format_duration(Duration::from_secs(rounded)))
}

pub fn render_time(stat: Option<&StatSnapshot>, style: TimeStyle, now: DateTime<Utc>) -> String {
    let Some(modified) = stat.and_then(StatSnapshot::modified) else {
        return PLACEHOLDER.to_string();
    };
    let local = modified.with_timezone(&Local);
    match style {
        TimeStyle::Relative => relative_time(modified, now),
        TimeStyle::Iso => local.format("%Y-%m-%d %H:%M").to_string(),
        TimeStyle::LongIso => local.format("%Y-%m-%d %H:%M:%S.%9f %z").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::EntryKind;
    use chrono::TimeZone;

    #[test]
    fn test_permission_string() {
        assert_eq!(permission_string(FileClass::Regular, 0o644), "-rw-r--r--");
        assert_eq!(permission_string(FileClass::Directory, 0o755), "drwxr-xr-x");
        assert_eq!(permission_string(FileClass::Symlink, 0o777), "lrwxrwxrwx");
        assert_eq!(permission_string(FileClass::Regular, 0o4755), "-rwsr-xr-x");
        assert_eq!(permission_string(FileClass::Regular, 0o2644), "-rw-r-Sr--");
        assert_eq!(permission_string(FileClass::Directory, 0o1777), "drwxrwxrwt");
        assert_eq!(permission_string(FileClass::Directory, 0o1776), "drwxrwxrwT");
    }

    #[test]
    fn test_missing_stat_permissions() {
        let entry = Entry::new("x", "x", EntryKind::Symlink);
        assert_eq!(entry_permissions(&entry), "l?????????");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0");
        assert_eq!(format_size(1023), "1023");
        assert_eq!(format_size(1536), "1.5K");
        assert_eq!(format_size(20 * 1024), "20K");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0M");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0G");
    }

    #[test]
    fn test_format_size_rounds_before_picking_unit() {
        assert_eq!(format_size(10_239), "10K");
        assert_eq!(format_size(10_188), "9.9K");
        assert_eq!(format_size(1_048_575), "1.0M");
        assert_eq!(format_size(1_048_576), "1.0M");
    }

    #[test]
    fn test_render_size_styles() {
        let stat = StatSnapshot {
            size: 1500,
            mtime: 0,
            mtime_nsec: 0,
            mode: 0o100_644,
            uid: 0,
            gid: 0,
            device: 0,
            inode: 0,
            nlink: 1,
            blocks: 8,
        };
        assert_eq!(render_size(Some(&stat), SizeStyle::Bytes), "1500");
        assert_eq!(render_size(Some(&stat), SizeStyle::Human), "1.5K");
        assert_eq!(render_size(Some(&stat), SizeStyle::Kilobytes), "2K");
        assert_eq!(render_size(None, SizeStyle::Bytes), "?");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let then = now - chrono::Duration::seconds(3 * 3600 + 125);
        assert_eq!(relative_time(then, now), "3h ago");
        let then = now - chrono::Duration::seconds(42);
        assert_eq!(relative_time(then, now), "42s ago");
        let then = now - chrono::Duration::days(3);
        assert_eq!(relative_time(then, now), "3days ago");
        assert_eq!(relative_time(now, now), "0s ago");
        let later = now + chrono::Duration::seconds(10);
        assert_eq!(relative_time(later, now), "in the future");
    }

    #[test]
    fn test_long_iso_has_nanoseconds_and_offset() {
        let stat = StatSnapshot {
            size: 0,
            mtime: 1_700_000_000,
            mtime_nsec: 123_456_789,
            mode: 0o100_644,
            uid: 0,
            gid: 0,
            device: 0,
            inode: 0,
            nlink: 1,
            blocks: 0,
        };
        let rendered = render_time(Some(&stat), TimeStyle::LongIso, Utc::now());
        assert!(rendered.contains(".123456789 "), "got {rendered}");
        let offset = rendered.rsplit(' ').next().unwrap();
        assert_eq!(offset.len(), 5);
        assert!(offset.starts_with('+') || offset.starts_with('-'));
        assert_eq!(render_time(None, TimeStyle::Iso, Utc::now()), "?");
    }
}
