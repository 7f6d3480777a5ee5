use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use ukmec::{
    EligibilityRequest, EligibilityService, Intent, Method, ReferenceTable, Resolver, Selection,
};

fn all_ids(table: &ReferenceTable) -> Vec<String> {
    table.conditions().map(|c| c.id.to_string()).collect()
}

fn bench_category(c: &mut Criterion) {
    let table = Arc::new(ReferenceTable::builtin().unwrap());
    let resolver = Resolver::new(Arc::clone(&table));
    let ids = all_ids(&table);

    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(ids.len() as u64));
    group.bench_function("category/all_conditions", |b| {
        b.iter(|| {
            resolver.category(
                black_box(Method::Chc),
                black_box(Intent::Initiation),
                ids.iter().map(String::as_str),
            )
        });
    });

    let selection = Selection::builder()
        .method(Method::Dmpa)
        .intent(Intent::Continuation)
        .conditions(ids.iter().cloned())
        .build()
        .unwrap();
    group.bench_function("resolve/selection", |b| {
        b.iter(|| resolver.resolve(black_box(&selection)));
    });
    group.bench_function("resolve_detailed/selection", |b| {
        b.iter(|| resolver.resolve_detailed(black_box(&selection)));
    });
    group.finish();
}

fn bench_service(c: &mut Criterion) {
    let service = EligibilityService::new(Arc::new(ReferenceTable::builtin().unwrap()));
    let request = EligibilityRequest::new("chc").with_conditions([
        "SMOKE_AGE_GE_35_GE15",
        "MIGRAINE_NO_AURA",
        "AF",
    ]);
    let body = serde_json::to_vec(&request).unwrap();

    c.bench_function("service/handle_json", |b| {
        b.iter(|| service.handle_json(black_box(&body)));
    });
}

fn bench_load(c: &mut Criterion) {
    c.bench_function("table/builtin_load", |b| {
        b.iter(|| ReferenceTable::builtin().unwrap());
    });
}

criterion_group!(benches, bench_category, bench_service, bench_load);
criterion_main!(benches);
