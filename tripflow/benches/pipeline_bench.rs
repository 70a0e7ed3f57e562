//! Benchmarks for pipeline execution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::sync::Arc;
use tripflow::prelude::*;
use tripflow::testing::ScriptedGenerator;

fn scripted_generator() -> ScriptedGenerator {
    let generator = ScriptedGenerator::new();
    generator.enqueue_value(json!({ "destination": "Cancun" }));
    generator.enqueue_value(json!({
        "from_city": "Boston",
        "to_city": "Cancun",
        "arrival_time": "2025-03-01T14:00"
    }));
    generator.enqueue_value(json!({
        "name": "Hotel Azul",
        "location": "Cancun Beachfront",
        "price_per_night_usd": 150,
        "stars": 4
    }));
    generator.enqueue_value(json!({
        "personalized_for": "Ana",
        "top_activities": ["snorkeling", "sunset cruise"]
    }));
    generator
}

fn pipeline_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let traveler = Traveler::new("Ana", "Boston");

    c.bench_function("plan_trip", |b| {
        b.iter(|| {
            let planner = TripPlanner::new(Arc::new(scripted_generator()));
            let context = runtime
                .block_on(planner.run(black_box("a relaxing beach vacation"), &traveler))
                .unwrap();
            black_box(context)
        })
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
