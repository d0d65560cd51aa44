use criterion::{Criterion, criterion_group, criterion_main};
use line_chart::api::LineChart;
use line_chart::core::{
    Accessors, ContinuousScale, Interpolation, LinePathGenerator, Point, Series,
};
use line_chart::render::Element;
use std::hint::black_box;

fn wave(len: usize, phase: f64) -> Vec<Point> {
    (0..len)
        .map(|i| {
            let x = i as f64;
            if i % 97 == 0 {
                Point::missing(x)
            } else {
                Point::new(x, (x * 0.01 + phase).sin() * 100.0)
            }
        })
        .collect()
}

fn bench_line_path_10k(c: &mut Criterion) {
    let accessors = Accessors::<Point>::default();
    let values = wave(10_000, 0.0);
    let x = ContinuousScale::linear((0.0, 10_000.0), (0.0, 1920.0));
    let y = ContinuousScale::linear((-100.0, 100.0), (1080.0, 0.0));

    for mode in [Interpolation::Linear, Interpolation::Monotone, Interpolation::Basis] {
        let generator = LinePathGenerator::new(&accessors, x, y).with_interpolation(mode);
        c.bench_function(&format!("line_path_10k_{mode}"), |b| {
            b.iter(|| {
                let _ = generator.path(black_box(&values)).expect("path");
            })
        });
    }
}

fn bench_chart_render_20x1k(c: &mut Criterion) {
    let data: Vec<Series<Point>> = (0..20)
        .map(|s| Series::new(format!("series-{s}"), wave(1_000, f64::from(s))))
        .collect();
    let mut chart = LineChart::<Point>::new();
    chart.set_interpolate(Interpolation::Monotone);
    let mut svg = Element::svg(1600.0, 900.0);
    chart.render(&mut svg, &data).expect("warm-up render");

    c.bench_function("chart_render_20x1k", |b| {
        b.iter(|| {
            let _ = chart
                .render(black_box(&mut svg), black_box(&data))
                .expect("render");
        })
    });
}

criterion_group!(benches, bench_line_path_10k, bench_chart_render_20x1k);
criterion_main!(benches);
