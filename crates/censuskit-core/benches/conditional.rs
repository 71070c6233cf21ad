//! Benchmarks for marginals and conditional distributions on census-sized
//! joint tables.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use censuskit_core::table::Dimension;
use censuskit_testutil::{age_education_table, gender_age_table};

fn bench_condition_on(c: &mut Criterion) {
    let mut group = c.benchmark_group("table/condition_on");

    let cases = vec![
        ("age_education", age_education_table(), Dimension::A, "25 to 34 years"),
        ("gender_age", gender_age_table(), Dimension::A, "Female"),
        ("absent_value", age_education_table(), Dimension::A, "Under 5 years"),
    ];

    for (name, table, dimension, label) in &cases {
        group.throughput(Throughput::Elements(table.cells().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), table, |b, table| {
            b.iter(|| table.condition_on(*dimension, black_box(label)))
        });
    }
    group.finish();
}

fn bench_marginal(c: &mut Criterion) {
    let table = gender_age_table();
    c.bench_function("table/marginal_age", |b| {
        b.iter(|| black_box(&table).marginal(Dimension::B))
    });
}

criterion_group!(benches, bench_condition_on, bench_marginal);
criterion_main!(benches);
