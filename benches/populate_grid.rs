use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use sheet_courier::artifact::{ArtifactOptions, write_artifact};
use sheet_courier::dataset::Dataset;
use sheet_courier::grid::populate;

fn generate_orders(rows: usize, width: usize) -> Value {
    let rows: Vec<Value> = (0..rows)
        .map(|i| {
            let mut row = serde_json::Map::new();
            row.insert("id".to_string(), json!(i));
            row.insert("ordered_at".to_string(), json!(format!("2024-01-{:02}", i % 28 + 1)));
            row.insert(
                "shipped_at".to_string(),
                json!(format!("2024-02-{:02} {:02}:00:00", i % 28 + 1, i % 24)),
            );
            row.insert("phone".to_string(), json!(format!("119{:08}", i)));
            for extra in 4..width {
                row.insert(format!("metric_{extra}"), json!(format!("{}.5", i * extra)));
            }
            Value::Object(row)
        })
        .collect();
    Value::Array(rows)
}

fn bench_populate(c: &mut Criterion) {
    let dataset = Dataset::from_values(&generate_orders(5_000, 40)).expect("dataset");
    c.bench_function("populate_5k_rows_40_cols", |b| {
        b.iter(|| populate(&dataset).expect("populate"))
    });

    let small = Dataset::from_values(&generate_orders(500, 12)).expect("dataset");
    let grid = populate(&small).expect("populate");
    c.bench_function("write_artifact_500_rows", |b| {
        b.iter_batched(
            || tempfile::tempdir().expect("temp dir"),
            |dir| write_artifact(&grid, dir.path(), &ArtifactOptions::default()).expect("write"),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_populate);
criterion_main!(benches);
