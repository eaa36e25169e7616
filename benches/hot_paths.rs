use criterion::{black_box, criterion_group, criterion_main, Criterion};
use globe::geo::{destination, haversine_distance, intermediate};
use globe::map::Tessellator;
use globe::{GeoPoint, RenderStyle, Scene};

fn bench_geodesy(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(61.765430),
                black_box(37.677704),
                black_box(-7.156018),
                black_box(59.241619),
            )
        })
    });

    c.bench_function("destination", |b| {
        b.iter(|| destination(black_box(61.765430), black_box(37.677704), black_box(437.714187), black_box(239.241619)))
    });

    c.bench_function("intermediate", |b| {
        b.iter(|| {
            intermediate(
                black_box(51.453349),
                black_box(-2.588323),
                black_box(40.645423),
                black_box(-73.903879),
                black_box(0.37),
            )
        })
    });
}

fn bench_tessellation(c: &mut Criterion) {
    let tess = Tessellator::default();

    c.bench_function("graticule_10deg", |b| b.iter(|| tess.graticule(black_box(10.0))));

    c.bench_function("geodesic_bristol_nyc", |b| {
        let from = GeoPoint::new(51.453349, -2.588323);
        let to = GeoPoint::new(40.645423, -73.903879);
        b.iter(|| tess.geodesic(black_box(from), black_box(to)))
    });
}

fn bench_render(c: &mut Criterion) {
    let style = RenderStyle::default();

    let mut graticule = Scene::new();
    graticule.draw_graticule(10.0);
    graticule.center_on(60.0, 5.0);
    c.bench_function("render_graticule_1024", |b| {
        b.iter(|| graticule.render(black_box(1024), &style))
    });

    let mut land = Scene::new();
    land.draw_land_boundaries();
    land.draw_country_boundaries();
    land.center_on(51.453349, -2.588323);
    c.bench_function("render_boundaries_512", |b| b.iter(|| land.render(black_box(512), &style)));
}

criterion_group!(benches, bench_geodesy, bench_tessellation, bench_render);
criterion_main!(benches);
