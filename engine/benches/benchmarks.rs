//! Performance benchmarks for locator-engine

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use locator_engine::{document, Catalog, Product, ProductFields};

fn populated_catalog(size: usize) -> Catalog {
    let created = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    Catalog::from_products((0..size).map(|i| {
        Product::new(
            format!("product_{}", i),
            ProductFields::new(format!("Product {}", size - i), format!("{}", i % 40))
                .with_notes(if i % 7 == 0 { "clearance" } else { "" }),
            created,
        )
        .unwrap()
    }))
}

fn bench_catalog_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_list");

    for size in [100, 1000, 5000] {
        let catalog = populated_catalog(size);

        group.bench_with_input(BenchmarkId::new("all", size), &catalog, |b, catalog| {
            b.iter(|| catalog.list(black_box("")))
        });

        group.bench_with_input(BenchmarkId::new("search", size), &catalog, |b, catalog| {
            b.iter(|| catalog.list(black_box("clear")))
        });
    }

    group.finish();
}

fn bench_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");

    let catalog = populated_catalog(1000);
    let json = document::to_json_pretty(catalog.products()).unwrap();

    group.bench_function("export_1000", |b| {
        b.iter(|| document::to_json_pretty(black_box(catalog.products())))
    });

    group.bench_function("import_1000", |b| {
        let now = Utc::now();
        b.iter(|| document::decode_products(black_box(&json), now))
    });

    group.finish();
}

criterion_group!(benches, bench_catalog_list, bench_document);
criterion_main!(benches);
