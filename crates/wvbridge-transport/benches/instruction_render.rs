//! Instruction rendering and inbound decoding benchmarks
//!
//! Measures the two hot paths of a bridge: turning an outbound call into
//! script text, and decoding an inbound payload.
//!
//! # Payload Sizes
//!
//! - **Small**: a scalar argument
//! - **Medium**: ~1KB record
//! - **Large**: ~100KB batch

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use wvbridge_transport::{CallResponse, Instruction, JsonCodec};

const ENTRY: &str = "window.nsWebViewInterface";

fn small_payload() -> Value {
    json!("ping")
}

fn medium_payload() -> Value {
    let metadata: Vec<Value> = (0..10)
        .map(|i| json!({"key": format!("key_{}", i), "value": format!("value_{}", i)}))
        .collect();
    json!({
        "user_id": 12345,
        "username": "john_doe",
        "email": "john@example.com",
        "display_name": "John \"JD\" Doe",
        "metadata": metadata,
        "permissions": ["read", "write", "admin"],
    })
}

fn large_payload() -> Value {
    Value::Array((0..1000).map(|_| medium_payload()).collect())
}

fn payloads() -> Vec<(&'static str, Value)> {
    vec![
        ("small", small_payload()),
        ("medium", medium_payload()),
        ("large", large_payload()),
    ]
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("instruction_render");

    for (name, payload) in payloads() {
        let size = serde_json::to_string(&payload).map(|s| s.len()).unwrap_or(0);
        group.throughput(Throughput::Bytes(size as u64));

        let emit = Instruction::emit("update", payload.clone());
        group.bench_with_input(BenchmarkId::new("emit", name), &emit, |b, i| {
            b.iter(|| black_box(i.render(ENTRY)))
        });

        let call = Instruction::call("1#42", "apply", vec![payload]);
        group.bench_with_input(BenchmarkId::new("call", name), &call, |b, i| {
            b.iter(|| black_box(i.render(ENTRY)))
        });
    }

    group.finish();
}

fn bench_inbound(c: &mut Criterion) {
    let codec = JsonCodec::new();
    let mut group = c.benchmark_group("inbound_decode");

    for (name, payload) in payloads() {
        let raw = CallResponse::success("1#42", payload)
            .to_json()
            .unwrap_or_default();
        group.throughput(Throughput::Bytes(raw.len() as u64));

        group.bench_with_input(BenchmarkId::new("call_response", name), &raw, |b, raw| {
            b.iter(|| {
                let value = codec.parse(black_box(raw)).or_raw(raw);
                black_box(CallResponse::from_payload(&value))
            })
        });
    }

    group.bench_function("malformed_fallback", |b| {
        b.iter(|| black_box(codec.parse(black_box("plain text payload")).or_raw("plain")))
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_inbound);
criterion_main!(benches);
