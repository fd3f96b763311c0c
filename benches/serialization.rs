use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_textplist::{
    from_str, parse_str, to_string, write_to_string, Dialect, ParseOptions, WriteOptions,
};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    c.bench_function("serialize_simple_struct", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let text = "{\n\tactive = <*BY>;\n\temail = \"alice@example.com\";\n\tid = <*I123>;\n\tname = Alice;\n}";

    c.bench_function("deserialize_simple_struct", |b| {
        b.iter(|| from_str::<User>(black_box(text)))
    });
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10, 50, 100, 500].iter() {
        let items = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&items)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_array");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| from_str::<Vec<Product>>(black_box(&text)))
        });
    }
    group.finish();
}

fn benchmark_dialects(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_dialect");
    let value = serde_textplist::to_value(&products(100)).unwrap();

    for dialect in [Dialect::OpenStep, Dialect::GNUstep, Dialect::ExtendedText] {
        let options = WriteOptions::new().with_dialect(dialect);
        group.bench_with_input(
            BenchmarkId::from_parameter(dialect),
            &options,
            |b, options| b.iter(|| write_to_string(black_box(&value), options)),
        );
    }
    group.finish();
}

fn benchmark_parse_escapes_and_data(c: &mut Criterion) {
    let mut text = String::from("{\n");
    for i in 0..200 {
        text.push_str(&format!(
            "\t\"key\\t{}\" = \"caf\\u00e9 \\101\\x42 line\\n\";\n\tblob{} = <deadbeef 00112233 4455>;\n",
            i, i
        ));
    }
    text.push('}');

    c.bench_function("parse_escapes_and_data", |b| {
        b.iter(|| parse_str(black_box(&text), &ParseOptions::default()))
    });
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_serialize_array,
    benchmark_deserialize_array,
    benchmark_dialects,
    benchmark_parse_escapes_and_data
);
criterion_main!(benches);
