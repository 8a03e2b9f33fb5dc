use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagecraft_blocks::{BlockRecord, Registry, SequentialIds};
use pagecraft_compiler_html::{compile_page, CompileOptions};

fn sample_page(copies: usize) -> Vec<BlockRecord> {
    let registry = Registry::global();
    let mut ids = SequentialIds::new("bench");
    let mut records = Vec::new();

    for _ in 0..copies {
        for entry in registry.entries() {
            records.push(BlockRecord::new(&mut ids, entry.default_data()));
        }
    }
    records
}

fn compile_small_page(c: &mut Criterion) {
    let records = sample_page(1);
    let options = CompileOptions::default();

    c.bench_function("compile_small_page", |b| {
        b.iter(|| compile_page(black_box(&records), Registry::global(), &options))
    });
}

fn compile_large_page(c: &mut Criterion) {
    let records = sample_page(20);
    let options = CompileOptions {
        pretty: false,
        ..CompileOptions::default()
    };

    c.bench_function("compile_large_page", |b| {
        b.iter(|| compile_page(black_box(&records), Registry::global(), &options))
    });
}

criterion_group!(benches, compile_small_page, compile_large_page);
criterion_main!(benches);
