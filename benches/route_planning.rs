use albion_transit::{config::Config, pathfinder::RoutePreferences, route::RouteService};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::{path::Path, time::Duration};

fn fixture_root() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/dataset"))
}

fn criterion_benchmark(c: &mut Criterion) {
    let (service, errors) = RouteService::load(fixture_root(), Config::default());
    for err in &errors {
        println!("fixture load warning: {err}");
    }
    let preferences = RoutePreferences::default();

    let mut group = c.benchmark_group("routing");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("direct route, single line", |b| {
        b.iter(|| {
            black_box(service.calculate_route(
                black_box("London Paddington"),
                black_box("Bristol Temple Meads"),
                None,
                &preferences,
            ))
        })
    });

    group.bench_function("interchange route, two lines", |b| {
        b.iter(|| {
            black_box(service.calculate_route(
                black_box("London Paddington"),
                black_box("Redhill"),
                None,
                &preferences,
            ))
        })
    });

    group.bench_function("possible destinations, two changes", |b| {
        b.iter(|| black_box(service.get_possible_destinations(black_box("Reading"), 2)))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
