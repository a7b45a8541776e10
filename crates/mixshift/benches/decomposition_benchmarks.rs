//! Decomposition performance benchmarks.
//!
//! Measures parsing, grouping and decomposition across different row counts
//! and dimension cardinalities.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mixshift::{Dataset, Decomposition, MappingRules, Parser};
use std::io::Write;
use tempfile::NamedTempFile;

/// Generate synthetic CSV data with two dimensions and four measures.
///
/// `cardinality` is the number of distinct values in each dimension.
fn generate_csv_data(rows: usize, cardinality: usize) -> String {
    let mut data = String::from("region,product,base_pop,curr_pop,base_sub,curr_sub\n");

    for row in 0..rows {
        let base_pop = 50 + (row * 7) % 500;
        let curr_pop = 40 + (row * 11) % 600;
        data.push_str(&format!(
            "R{},P{},{},{},{},{}\n",
            row % cardinality,
            (row / cardinality) % cardinality,
            base_pop,
            curr_pop,
            base_pop / 10,
            curr_pop / 8,
        ));
    }

    data
}

fn dataset(rows: usize, cardinality: usize) -> Dataset {
    let table = Parser::new()
        .parse_str(&generate_csv_data(rows, cardinality))
        .unwrap();
    Dataset::from_table(&table).unwrap()
}

/// Benchmark parsing CSV files of various sizes.
fn bench_parse_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows, 10);
        let bytes = data.len();

        group.throughput(Throughput::Bytes(bytes as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| {
                    let parser = Parser::new();
                    black_box(parser.parse_file(temp.path()).unwrap())
                },
            )
        });
    }

    group.finish();
}

/// Benchmark the decomposition itself on an already parsed dataset.
fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");

    for rows in [1_000, 10_000, 100_000].iter() {
        let data = dataset(*rows, 20);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let pipeline = Decomposition::new();
            b.iter(|| black_box(pipeline.run(data).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark how the group count affects decomposition with combination tracking.
fn bench_group_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_scaling");

    let rows = 10_000;
    for cardinality in [2, 10, 50, 100].iter() {
        let data = dataset(rows, *cardinality);

        group.bench_with_input(
            BenchmarkId::new("cardinality", cardinality),
            &data,
            |b, data| {
                let pipeline = Decomposition::new().with_combinations(true);
                b.iter(|| black_box(pipeline.run(data).unwrap()))
            },
        );
    }

    group.finish();
}

/// Benchmark decomposition after remapping one dimension.
fn bench_mapping(c: &mut Criterion) {
    let data = dataset(10_000, 50);
    let rules = MappingRules::parse(
        "low=R0|R1|R2|R3|R4|R5|R6|R7|R8|R9\nhigh=R40|R41|R42|R43|R44|R45|R46|R47|R48|R49",
    )
    .unwrap();
    let pipeline = Decomposition::new().with_mapping("region", rules);

    c.bench_function("decompose_with_mapping", |b| {
        b.iter(|| black_box(pipeline.run(&data).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_parse_csv,
    bench_decompose,
    bench_group_scaling,
    bench_mapping,
);
criterion_main!(benches);
