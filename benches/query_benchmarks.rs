//! Criterion benchmarks for surreal_query

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use std::sync::Arc;
use surreal_query::prelude::*;

// ============================================================================
// Argument Rendering Benchmarks
// ============================================================================

fn bench_render_scalars(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_scalars");
    group.throughput(Throughput::Elements(1));

    group.bench_function("int", |b| {
        let arg = QueryArg::from(123456789i64);
        b.iter(|| black_box(arg.render(black_box(Quoting::Quoted))));
    });

    group.bench_function("float", |b| {
        let arg = QueryArg::from(std::f64::consts::PI);
        b.iter(|| black_box(arg.render(black_box(Quoting::Quoted))));
    });

    group.bench_function("string_quoted", |b| {
        let arg = QueryArg::from("Hello, World!");
        b.iter(|| black_box(arg.render(black_box(Quoting::Quoted))));
    });

    group.bench_function("record_id", |b| {
        let arg = QueryArg::from("person:tobie");
        b.iter(|| black_box(arg.render(black_box(Quoting::Quoted))));
    });

    group.finish();
}

fn bench_render_collections(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_collections");

    for size in [10, 100, 1000].iter() {
        let list = QueryArg::list((0..*size).map(|i| format!("item{}", i)));
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("list", size), &list, |b, list| {
            b.iter(|| black_box(list.render(Quoting::Quoted)));
        });

        let map = QueryArg::map((0..*size).map(|i| (format!("key{}", i), QueryArg::from(i))));
        group.bench_with_input(BenchmarkId::new("map", size), &map, |b, map| {
            b.iter(|| black_box(map.render(Quoting::Quoted)));
        });
    }

    group.finish();
}

fn bench_from_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_json");

    let document = json!({
        "name": "Tobie",
        "company": "SurrealDB",
        "skills": ["Rust", "Go", "JavaScript"],
        "address": { "city": "London", "postcode": "SW1A" }
    });

    group.bench_function("nested_document", |b| {
        b.iter(|| {
            let arg = QueryArg::from(black_box(document.clone()));
            black_box(arg.render(Quoting::Quoted))
        });
    });

    group.finish();
}

// ============================================================================
// Builder Benchmarks
// ============================================================================

fn bench_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder");
    group.throughput(Throughput::Elements(1));

    group.bench_function("select_where", |b| {
        b.iter(|| {
            let mut query = Query::default();
            query
                .select(black_box(["name", "founded"]))
                .from("company")
                .where_("founded > 2000");
            black_box(query.finalized())
        });
    });

    group.bench_function("insert_tuple", |b| {
        b.iter(|| {
            let mut query = Query::default();
            query.insert("company (name, founded)", black_box(("Acme", 1999)));
            black_box(query.finalized())
        });
    });

    group.bench_function("relate_content", |b| {
        let content = QueryArg::map([("since", QueryArg::from("2021-09-10"))]);
        b.iter(|| {
            let mut query = Query::default();
            query.relate_content("person:tobie", "works_at", "company:surreal", content.clone());
            black_box(query.finalized())
        });
    });

    group.finish();
}

// ============================================================================
// Execution Benchmarks
// ============================================================================

/// Client answering every statement with the same envelope
struct FixedClient {
    response: Value,
}

#[async_trait]
impl Client for FixedClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Http
    }

    async fn query(&self, _statement: &str) -> Result<Value> {
        Ok(self.response.clone())
    }

    async fn use_ns(&self, _namespace: &str, _database: &str) -> Result<Option<ClientHandle>> {
        Ok(None)
    }
}

fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => panic!("failed to start runtime: {e}"),
    };

    for rows in [1, 100].iter() {
        let result: Vec<Value> = (0..*rows).map(|i| json!({ "id": i })).collect();
        let client: ClientHandle = Arc::new(FixedClient {
            response: json!([{ "time": "1ms", "status": "OK", "result": result }]),
        });

        group.bench_with_input(BenchmarkId::new("select", rows), &client, |b, client| {
            b.to_async(&runtime).iter(|| {
                let client = client.clone();
                async move {
                    let mut query = Query::with_client(client);
                    query.select("*").from("person");
                    black_box(query.execute().await)
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_scalars,
    bench_render_collections,
    bench_from_json,
    bench_builder,
    bench_execute
);
criterion_main!(benches);
