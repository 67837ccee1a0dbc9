use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Deserialize;
use serde_tomlite::{from_str, parse, tokenize};

#[derive(Deserialize)]
#[allow(dead_code)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct Catalog {
    products: Vec<Product>,
}

const SIMPLE: &str = r#"
title = "TOML Example"

[owner]
name = "Tom Preston-Werner"
dob = 1979-05-27T07:32:00Z

[database]
server = "192.168.1.1"
ports = [ 8001, 8001, 8002 ]
connection_max = 5000
enabled = true
"#;

fn catalog(size: u32) -> String {
    (0..size)
        .map(|i| {
            format!(
                "[[products]]\nsku = \"SKU{i}\"\nname = \"Product {i}\" # generated\nprice = {}.99\nquantity = {i}\n\n",
                9 + i
            )
        })
        .collect()
}

fn benchmark_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_simple", |b| b.iter(|| tokenize(black_box(SIMPLE))));
}

fn benchmark_parse_simple(c: &mut Criterion) {
    c.bench_function("parse_simple", |b| b.iter(|| parse(black_box(SIMPLE))));
}

fn benchmark_parse_table_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_table_arrays");

    for size in [10, 50, 100, 500].iter() {
        let input = catalog(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| parse(black_box(input)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_catalog");

    for size in [10, 100].iter() {
        let input = catalog(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| from_str::<Catalog>(black_box(input)))
        });
    }
    group.finish();
}

fn benchmark_large_array(c: &mut Criterion) {
    let body = (0..1000).map(|i| i.to_string()).collect::<Vec<_>>().join(",\n  ");
    let input = format!("values = [\n  {body}\n]\n");

    c.bench_function("parse_multiline_array_1000", |b| {
        b.iter(|| parse(black_box(&input)))
    });
}

criterion_group!(
    benches,
    benchmark_tokenize,
    benchmark_parse_simple,
    benchmark_parse_table_arrays,
    benchmark_deserialize_catalog,
    benchmark_large_array
);
criterion_main!(benches);
