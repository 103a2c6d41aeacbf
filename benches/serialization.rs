use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_snbt::{decode, encode, from_str, to_string, Value};

#[derive(Serialize, Deserialize, Clone)]
struct Task {
    id: String,
    item: String,
    count: u32,
}

#[derive(Serialize, Deserialize, Clone)]
struct Quest {
    id: String,
    title: String,
    x: f64,
    y: f64,
    dependencies: Vec<String>,
    tasks: Vec<Task>,
}

fn quests(n: u32) -> Vec<Quest> {
    (0..n)
        .map(|i| Quest {
            id: format!("{:016X}", i),
            title: format!("Quest {}", i),
            x: f64::from(i) * 1.5,
            y: -f64::from(i % 7),
            dependencies: (0..i.min(3)).map(|d| format!("{:016X}", d)).collect(),
            tasks: vec![Task {
                id: format!("{:016X}", i + 10_000),
                item: "minecraft:oak_log".to_string(),
                count: i % 64 + 1,
            }],
        })
        .collect()
}

/// A chapter as it appears on disk: tab-indented, no commas, suffixed numbers.
fn chapter_text(n: u32) -> String {
    let mut out = String::from("{\n\tid: \"2B6E9F1C0A7D3E45\"\n\tquests: [\n");
    for i in 0..n {
        out.push_str(&format!(
            "\t\t{{\n\t\t\tid: \"{:016X}\"\n\t\t\ttitle: \"Quest {}\"\n\t\t\tx: {}.5d\n\t\t\ty: -{}.0d\n\t\t\ttasks: [{{ count: {}L, item: \"minecraft:oak_log\" }}]\n\t\t}}\n",
            i, i, i, i % 7, i % 64 + 1
        ));
    }
    out.push_str("\t]\n}\n");
    out
}

fn benchmark_decode_chapter(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_chapter");

    for size in [10, 50, 100, 500].iter() {
        let text = chapter_text(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| decode(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_encode_chapter(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_chapter");

    for size in [10, 50, 100, 500].iter() {
        let value: Value = decode(&chapter_text(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| encode(black_box(value)))
        });
    }
    group.finish();
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10, 50, 100, 500].iter() {
        let data = quests(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| to_string(black_box(data)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_array");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&quests(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str::<Vec<Quest>>(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");

    let plain = Value::from("This is a quest description without any escapes at all");
    let escaped = Value::from("Line one\nLine \"two\"\twith\\escapes \u{1} and ünïcödé");
    let plain_text = encode(&plain).unwrap();
    let escaped_text = encode(&escaped).unwrap();

    group.bench_function("encode_plain", |b| b.iter(|| encode(black_box(&plain))));
    group.bench_function("encode_escaped", |b| b.iter(|| encode(black_box(&escaped))));
    group.bench_function("decode_plain", |b| b.iter(|| decode(black_box(&plain_text))));
    group.bench_function("decode_escaped", |b| {
        b.iter(|| decode(black_box(&escaped_text)))
    });

    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let data = quests(100);

    let mut group = c.benchmark_group("comparison");

    group.bench_function("snbt_serialize", |b| {
        b.iter(|| serde_snbt::to_string(black_box(&data)))
    });

    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&data)))
    });

    let snbt_str = serde_snbt::to_string(&data).unwrap();
    let json_str = serde_json::to_string(&data).unwrap();

    group.bench_function("snbt_deserialize", |b| {
        b.iter(|| serde_snbt::from_str::<Vec<Quest>>(black_box(&snbt_str)))
    });

    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_str::<Vec<Quest>>(black_box(&json_str)))
    });

    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let text = chapter_text(50);

    c.bench_function("roundtrip_chapter", |b| {
        b.iter(|| {
            let value = decode(black_box(&text)).unwrap();
            let _encoded = encode(black_box(&value)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_decode_chapter,
    benchmark_encode_chapter,
    benchmark_serialize_array,
    benchmark_deserialize_array,
    benchmark_strings,
    benchmark_comparison_with_json,
    benchmark_roundtrip
);
criterion_main!(benches);
