//! Filter, query and join benchmarks.
//!
//! Measures filtering cost across dataset sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sift::{build_filter, DatasetPool, JoinKind, JoinSpec, Parser, Query, SimpleFilter};

/// Generate synthetic CSV data with numeric, categorical and date columns.
fn generate_csv_data(rows: usize) -> String {
    let mut data = String::from("id,score,category,day\n");
    for row in 0..rows {
        data.push_str(&format!(
            "{},{:.2},Category_{},2023-{:02}-{:02}\n",
            row,
            row as f64 * 1.5,
            row % 10,
            (row % 12) + 1,
            (row % 28) + 1
        ));
    }
    data
}

fn bench_simple_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_filters");

    for rows in [1_000, 10_000, 100_000].iter() {
        let dataset = Parser::new().parse_str(&generate_csv_data(*rows)).unwrap();
        let filters = vec![
            SimpleFilter::numeric("score", 100.0, 5_000.0),
            SimpleFilter::values("category", ["Category_1", "Category_3"]),
        ];

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            let mut session = build_filter(dataset.clone());
            b.iter(|| black_box(session.apply_simple_filters(&filters)));
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let query = Query::from_terms(&[
        "score > 100",
        "and",
        "category == Category_7",
        "or",
        "id < 50",
    ])
    .unwrap();

    for rows in [1_000, 10_000, 100_000].iter() {
        let dataset = Parser::new().parse_str(&generate_csv_data(*rows)).unwrap();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            let mut session = build_filter(dataset.clone());
            b.iter(|| black_box(session.apply_query(&query)));
        });
    }

    group.finish();
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");

    for rows in [1_000, 10_000].iter() {
        let left = Parser::new().parse_str(&generate_csv_data(*rows)).unwrap();
        let right = Parser::new().parse_str(&generate_csv_data(*rows / 2)).unwrap();
        let pool = DatasetPool::new().with("left", left).with("right", right);
        let config = sift::FilterConfig::default();

        for kind in [JoinKind::Inner, JoinKind::Outer] {
            let spec = JoinSpec::new("left", "right", "id", "id").with_kind(kind);
            group.bench_with_input(BenchmarkId::new(kind.to_string(), rows), &spec, |b, spec| {
                b.iter(|| black_box(sift::join(&pool, spec, &config).unwrap()));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_simple_filters, bench_query, bench_join);
criterion_main!(benches);
