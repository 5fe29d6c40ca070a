use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use jsondom::{to_document, to_json_text, validate};

fn benchmark_value_to_document_conversion(c: &mut Criterion) {
    // Simple object benchmark
    c.bench_function("simple_object", |b| {
        let value = json!({
            "name": "Alice",
            "age": 30,
            "active": true,
            "balance": 1250.50
        });
        b.iter(|| to_document(black_box(&value)))
    });

    // Nested structure benchmark
    c.bench_function("nested_structure", |b| {
        let value = json!({
            "metadata": {
                "version": 1,
                "author": "system",
                "settings": {
                    "debug": true,
                    "timeout": 30
                }
            },
            "data": {
                "items": [
                    {"id": 1, "name": "Item1", "tags": ["urgent", "pending"]},
                    {"id": 2, "name": "Item2", "tags": ["normal"]}
                ]
            }
        });
        b.iter(|| to_document(black_box(&value)))
    });

    // Large array benchmark
    c.bench_function("large_array", |b| {
        let mut users = Vec::new();
        for i in 0..1000 {
            users.push(json!({
                "id": i,
                "name": format!("User{}", i),
                "email": format!("user{}@example.com", i),
                "active": i % 2 == 0
            }));
        }
        let value = json!({ "users": users });
        b.iter(|| to_document(black_box(&value)))
    });

    // Convert-and-serialize benchmark (the dispatcher's hot path)
    c.bench_function("convert_and_serialize", |b| {
        let value = json!({
            "name": "Test",
            "data": [1, 2, 3, 4, 5],
            "nested": {"key": "value"}
        });
        b.iter(|| to_json_text(black_box(&value)))
    });

    // Validation benchmark over a converted tree
    c.bench_function("validate_tree", |b| {
        let value = json!({
            "readings": [1, "two", 3],
            "nested": {"list": [true, 1]}
        });
        let doc = to_document(&value).unwrap();
        let root = doc.root().unwrap();
        b.iter(|| validate(black_box(root)))
    });
}

criterion_group!(benches, benchmark_value_to_document_conversion);
criterion_main!(benches);
