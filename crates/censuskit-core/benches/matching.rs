//! Benchmarks for category matching across the three strategies.
//!
//! Matching runs once per source per query, and crosswalks run it once per
//! vocabulary label, so regex parsing of bracket labels dominates.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use censuskit_core::category::{CategoryValue, Family};
use censuskit_core::matcher::{build_crosswalk, Matcher};

fn candidates(family: Family, labels: &[&str]) -> Vec<CategoryValue> {
    labels
        .iter()
        .map(|l| CategoryValue::new(family, *l))
        .collect()
}

fn bench_match_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("match/value");
    let matcher = Matcher::default();

    let cases = vec![
        (
            "interval_age",
            CategoryValue::new(Family::Age, "30 to 40 years"),
            candidates(Family::Age, Family::Age.standard_labels()),
        ),
        (
            "interval_income",
            CategoryValue::new(Family::Income, "$40,000 to $60,000"),
            candidates(Family::Income, Family::Income.standard_labels()),
        ),
        (
            "hierarchy_education",
            CategoryValue::new(Family::Education, "Master's degree"),
            candidates(Family::Education, Family::Education.standard_labels()),
        ),
        (
            "token_race_fallback",
            CategoryValue::new(Family::Race, "Spanish speaking residents"),
            candidates(Family::Race, Family::Race.standard_labels()),
        ),
        (
            "token_gender",
            CategoryValue::new(Family::Gender, "Female population"),
            candidates(Family::Gender, Family::Gender.standard_labels()),
        ),
    ];

    for (name, target, list) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), list, |b, list| {
            b.iter(|| matcher.match_value(black_box(target), black_box(list)))
        });
    }
    group.finish();
}

fn bench_crosswalk(c: &mut Criterion) {
    let mut group = c.benchmark_group("match/crosswalk");
    let matcher = Matcher::default();
    let coarse = ["Under 25 years", "25 to 44 years", "45 to 64 years", "65 years and over"];

    for family in [Family::Age, Family::Income] {
        let from = family.standard_labels();
        group.throughput(Throughput::Elements(from.len() as u64));
        group.bench_function(BenchmarkId::from_parameter(family), |b| {
            b.iter(|| build_crosswalk(&matcher, family, black_box(from), black_box(&coarse[..])))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_match_value, bench_crosswalk);
criterion_main!(benches);
