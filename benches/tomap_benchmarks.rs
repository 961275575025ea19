use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tomap_core::descriptor::{Field, Layout, TableMapped};
use tomap_core::{
    from_table, generate_source, to_table, CommentSet, GeneratorOptions, MapperOptions, Node,
    Table,
};

// ============================================================================
// Fixtures: a small flat table and a medium nested one
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
struct Endpoint {
    host: String,
    port: i64,
    weight: f64,
}

impl TableMapped for Endpoint {
    fn layout() -> Layout<Self> {
        Layout::new()
            .with(Field::value(
                "host",
                |e: &Endpoint| e.host.clone(),
                |e, v| e.host = v,
            ))
            .with(Field::value("port", |e: &Endpoint| e.port, |e, v| e.port = v))
            .with(Field::value(
                "weight",
                |e: &Endpoint| e.weight,
                |e, v| e.weight = v,
            ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Deployment {
    name: String,
    replicas: i64,
    endpoints: Vec<Endpoint>,
    labels: Vec<String>,
}

impl TableMapped for Deployment {
    fn layout() -> Layout<Self> {
        Layout::new()
            .with(Field::value(
                "name",
                |d: &Deployment| d.name.clone(),
                |d, v| d.name = v,
            ))
            .with(Field::value(
                "replicas",
                |d: &Deployment| d.replicas,
                |d, v| d.replicas = v,
            ))
            .with(Field::nested_seq(
                "endpoints",
                |d: &Deployment| d.endpoints.clone(),
                |d, v| d.endpoints = v,
            ))
            .with(Field::value(
                "labels",
                |d: &Deployment| d.labels.clone(),
                |d, v| d.labels = v,
            ))
    }
}

fn endpoint_table(i: i64) -> Table {
    let mut table = Table::new();
    table.insert("host", format!("node-{i}.internal"));
    table.insert("port", 8000 + i);
    table.insert("weight", 1.0 / (i + 1) as f64);
    table
}

fn medium_table() -> Table {
    let mut table = Table::new();
    table.insert("name", "edge");
    table.insert("replicas", 12i64);
    table.insert(
        "endpoints",
        Node::Array((0..32).map(|i| Node::Table(endpoint_table(i))).collect()),
    );
    table.insert(
        "labels",
        Node::Array((0..16).map(|i| Node::from(format!("label-{i}"))).collect()),
    );
    table
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_deserialize(c: &mut Criterion) {
    let table = medium_table();
    let options = MapperOptions::default();
    c.bench_function("from_table/medium", |b| {
        b.iter(|| {
            let deployment: Deployment = from_table(black_box(&table), &options).unwrap();
            black_box(deployment)
        });
    });
}

fn bench_serialize(c: &mut Criterion) {
    let deployment: Deployment =
        from_table(&medium_table(), &MapperOptions::default()).unwrap();
    let options = MapperOptions::default();
    c.bench_function("to_table/medium", |b| {
        b.iter(|| black_box(to_table(black_box(&deployment), &options).unwrap()));
    });
}

fn bench_generate(c: &mut Criterion) {
    let table = medium_table();
    let comments = CommentSet::new();
    let options = GeneratorOptions::default();
    c.bench_function("generate_source/medium", |b| {
        b.iter(|| {
            black_box(
                generate_source(black_box(&table), "Deployment", &comments, &options).unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_deserialize, bench_serialize, bench_generate);
criterion_main!(benches);
