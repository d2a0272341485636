//! Table decoding performance benchmarks.
//!
//! Measures decoding across table sizes and dialects, plus cell evaluation on its own.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rowcase::value::{CellSite, evaluate};
use rowcase::{Origin, Rowcase};
use std::io::Write;
use tempfile::NamedTempFile;

/// Generate a markdown table with the specified number of rows and columns.
fn generate_markdown(rows: usize, cols: usize) -> String {
    let header: Vec<String> = (0..cols).map(|i| format!("column_{}", i + 1)).collect();
    let mut data = format!("| {} |\n", header.join(" | "));
    data.push_str(&format!("|{}\n", "---|".repeat(cols)));

    for row in 0..rows {
        let cells: Vec<String> = (0..cols).map(|col| cell(row, col)).collect();
        data.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    data
}

/// Generate delimited data with the same cells.
fn generate_delimited(rows: usize, cols: usize, delimiter: char) -> String {
    let mut data = (0..cols)
        .map(|i| format!("column_{}", i + 1))
        .collect::<Vec<_>>()
        .join(&delimiter.to_string());
    data.push('\n');

    for row in 0..rows {
        let cells: Vec<String> = (0..cols).map(|col| cell(row, col)).collect();
        data.push_str(&cells.join(&delimiter.to_string()));
        data.push('\n');
    }

    data
}

// Mix of literal kinds, without commas so the CSV stays unquoted
fn cell(row: usize, col: usize) -> String {
    match col % 6 {
        0 => format!("{}", row),
        1 => format!("{:.2}", row as f64 * 1.5),
        2 => format!(":category_{}", row % 10),
        3 => (if row % 2 == 0 { "true" } else { "false" }).to_string(),
        4 => format!("\"label {}\"", row),
        5 => format!("Free text {}", row),
        _ => unreachable!(),
    }
}

/// Benchmark decoding inline markdown tables of various sizes.
fn bench_decode_markdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_markdown");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_markdown(*rows, 6);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let rowcase = Rowcase::new();
            b.iter(|| black_box(rowcase.parse_markdown(data, &Origin::detached()).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark loading CSV and TSV files.
fn bench_load_files(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_file");

    for (suffix, delimiter) in [(".csv", ','), (".tsv", '\t')] {
        for rows in [100, 1_000, 10_000].iter() {
            let data = generate_delimited(*rows, 6, delimiter);

            group.throughput(Throughput::Bytes(data.len() as u64));
            group.bench_with_input(BenchmarkId::new(&suffix[1..], rows), &data, |b, data| {
                b.iter_with_setup(
                    || {
                        let mut temp = NamedTempFile::with_suffix(suffix).unwrap();
                        temp.write_all(data.as_bytes()).unwrap();
                        temp
                    },
                    |temp| {
                        let rowcase = Rowcase::new();
                        black_box(rowcase.parse_file(temp.path()).unwrap())
                    },
                )
            });
        }
    }

    group.finish();
}

/// Benchmark evaluating single cells.
fn bench_evaluate_cells(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_cell");

    let cells = [
        ("integer", "1_000_000"),
        ("float", "-12.5e3"),
        ("string", "\"hello \\\"world\\\"\""),
        ("list", "[1, :two, \"three\", [4, 5]]"),
        ("map", "%{name: \"Ada\", tags: [:a, :b], age: 36}"),
        ("raw", "not a literal at all"),
    ];

    for (name, text) in cells {
        group.bench_with_input(BenchmarkId::new("kind", name), text, |b, text| {
            let site = CellSite::row(text);
            b.iter(|| black_box(evaluate(text, &site).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark naming every row of a table.
fn bench_case_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("case_names");

    for rows in [100, 1_000].iter() {
        let examples = Rowcase::new()
            .parse_markdown(&generate_markdown(*rows, 6), &Origin::detached())
            .unwrap();

        group.bench_with_input(BenchmarkId::new("rows", rows), &examples, |b, examples| {
            let rowcase = Rowcase::new();
            b.iter(|| black_box(rowcase.cases("bench", examples.clone())))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_decode_markdown,
    bench_load_files,
    bench_evaluate_cells,
    bench_case_names,
);
criterion_main!(benches);
