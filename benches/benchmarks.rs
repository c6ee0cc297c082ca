//! Performance benchmarks for peel

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use peel::listing::{
    Entry, EntryCollector, EntryKind, FilterConfig, Layout, SortConfig, Sorter, StatSnapshot,
};
use peel::output::{Formatter, OutputConfig};
use peel::test_utils::TestDir;

fn synthetic_entries(count: usize) -> Vec<Entry> {
    (0..count)
        .map(|i| {
            let name = format!("file_{:05}.rs", (i * 7919) % count);
            let kind = if i % 10 == 0 {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let mode = if kind == EntryKind::Directory {
                0o040_755
            } else {
                0o100_644
            };
            Entry::new(name.clone(), name, kind).with_stat(StatSnapshot {
                size: (i as u64 * 131) % 100_000,
                mtime: 1_700_000_000 + (i as i64 * 37) % 86_400,
                mtime_nsec: 0,
                mode,
                uid: 1000,
                gid: 1000,
                device: 1,
                inode: i as u64,
                nlink: 1,
                blocks: 8,
            })
        })
        .collect()
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    let entries = synthetic_entries(5_000);

    let configs = [
        ("name", SortConfig::default()),
        (
            "time",
            SortConfig {
                by_time: true,
                ..Default::default()
            },
        ),
        (
            "size_dirs_first_reversed",
            SortConfig {
                by_size: true,
                directories_first: true,
                reverse: true,
                ..Default::default()
            },
        ),
    ];

    for (label, config) in configs {
        let sorter = Sorter::new(config);
        group.bench_function(label, |b| {
            b.iter_batched(
                || entries.clone(),
                |mut batch| {
                    sorter.sort(&mut batch);
                    black_box(batch)
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("columns");
    let entries = synthetic_entries(2_000);

    for width in [80, 200] {
        let formatter = Formatter::new(OutputConfig {
            layout: Layout::Columns,
            width,
            ..Default::default()
        });
        group.bench_function(format!("width_{width}"), |b| {
            b.iter_batched(
                || entries.clone(),
                |batch| black_box(formatter.format_to_string(&batch)),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_collect(c: &mut Criterion) {
    let dir = TestDir::new();
    for i in 0..500 {
        dir.add_file(&format!("file_{i}.txt"), "");
    }
    let collector = EntryCollector::new(FilterConfig::default());

    c.bench_function("collect_500_entries", |b| {
        b.iter(|| black_box(collector.collect(dir.path())))
    });
}

criterion_group!(benches, bench_sort, bench_columns, bench_collect);
criterion_main!(benches);
