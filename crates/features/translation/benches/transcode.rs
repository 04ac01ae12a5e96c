use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use vitrine_domain::TranslationBundle;
use vitrine_translation::{export_json, flatten, import_json, unflatten};

fn synthetic_bundle(sections: usize, keys_per_section: usize) -> TranslationBundle {
    (0..sections)
        .flat_map(|s| {
            (0..keys_per_section).map(move |k| {
                (format!("page{s}.section{}.key{k}", k % 7), format!("Translated text {s}/{k}"))
            })
        })
        .collect()
}

fn bench_transcode(c: &mut Criterion) {
    let mut group = c.benchmark_group("transcode");

    for (name, sections, keys) in [("small", 4, 25), ("site", 20, 100), ("large", 50, 400)] {
        let bundle = synthetic_bundle(sections, keys);
        let tree = unflatten(&bundle).unwrap();
        group.throughput(Throughput::Elements(bundle.len() as u64));

        group.bench_with_input(BenchmarkId::new("unflatten", name), &bundle, |b, bundle| {
            b.iter(|| black_box(unflatten(bundle).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("flatten", name), &tree, |b, tree| {
            b.iter(|| black_box(flatten(tree).unwrap()));
        });
    }

    group.finish();
}

fn bench_bundle_io(c: &mut Criterion) {
    let mut group = c.benchmark_group("bundle_io");
    let bundle = synthetic_bundle(20, 100);
    let text = export_json(&bundle);
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("export_json", |b| b.iter(|| black_box(export_json(&bundle))));
    group.bench_function("import_json", |b| b.iter(|| black_box(import_json(&text).unwrap())));

    group.finish();
}

criterion_group!(benches, bench_transcode, bench_bundle_io);
criterion_main!(benches);
