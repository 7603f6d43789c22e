use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use info_markup::{trace, Configuration, Reader, Validator};

// ============================================================================
// Test Data: Varying Complexity and Size
// ============================================================================

const TINY_INFO: &str = "value 42\n";

const SMALL_INFO: &str = "\
[anim walk]
\tframes (0 1 2 3)
\tduration 400ms
\tloop
";

const MEDIUM_INFO: &str = "\
# Fighter moveset
version 2

[moveset ryu]
\tspeed 1
\t[move punch 3]
\t\tanim jab
\t\tdamage 10
\t\tspeed 120%
\t\tloop
\t[move kick 5]
\t\tanim roundhouse
\t\tdamage +5
\t\ttiming 250ms 500ms
\t\t[hit high]
\t\t\tbox (0 10 20 30)
\t\t\tdamage +2
[anim jab]
\tframes (0 1 2 3)
\tduration 200ms
[anim roundhouse]
\tframes (0 1 2 3 4 5)
\tname \"Round House\"
";

// Generate a large moveset for stress testing
fn generate_moveset(moves: usize) -> String {
    let mut info = String::from("[moveset generated]\n\tspeed 1\n");
    for i in 0..moves {
        info.push_str(&format!(
            "\t[move m{} {}]\n\t\tanim a{}\n\t\tdamage {}\n\t\tspeed {}%\n\t\ttiming {}ms {}ms\n",
            i,
            i % 7,
            i,
            i * 3,
            50 + i % 100,
            i * 10,
            i * 20
        ));
    }
    info
}

fn config() -> Configuration {
    let mut config = Configuration::default();
    config.add_unit_scale("ms", 0.001);
    config
}

fn read_all(source: &str) -> usize {
    let mut reader = Reader::from_text(source, config());
    let mut events = 0;
    while reader.read().unwrap() {
        events += 1;
    }
    events
}

// ============================================================================
// Reader Benchmarks
// ============================================================================

fn bench_reader_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_sizes");

    for (name, source) in [
        ("tiny", TINY_INFO),
        ("small", SMALL_INFO),
        ("medium", MEDIUM_INFO),
    ] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| read_all(black_box(src)))
        });
    }

    group.finish();
}

fn bench_reader_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_scaling");

    for size in [10, 100, 1000, 5000] {
        let source = generate_moveset(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| read_all(black_box(src)))
        });
    }

    group.finish();
}

// ============================================================================
// Validation and Trace Benchmarks
// ============================================================================

fn bench_validated_read(c: &mut Criterion) {
    let mut validator = Validator::new();
    validator
        .set_element_rules("moveset", "text", "/", "speed")
        .unwrap();
    validator
        .set_element_rules("move", "text, number", "moveset", "anim, damage, speed, timing")
        .unwrap();
    let source = generate_moveset(1000);

    c.bench_function("validated_read_1000", |b| {
        b.iter(|| {
            let mut reader = Reader::from_text(black_box(&source), config());
            while reader.read_validated(&validator).unwrap() {}
        })
    });
}

fn bench_trace_to_json(c: &mut Criterion) {
    c.bench_function("trace_to_json_medium", |b| {
        b.iter(|| {
            let trace = trace(black_box(MEDIUM_INFO).as_bytes(), config(), None).unwrap();
            trace.to_json().unwrap()
        })
    });
}

criterion_group!(reader_benches, bench_reader_sizes, bench_reader_scaling);

criterion_group!(trace_benches, bench_validated_read, bench_trace_to_json);

criterion_main!(reader_benches, trace_benches);
