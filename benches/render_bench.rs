//! Benchmarks for the report rendering pipeline
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

use reportview::dispatch::Dispatcher;
use reportview::logging::TracingLog;
use reportview::render::{ChartRenderer, RenderSurface, SurfaceRegistry};
use reportview::report::{ChartKind, ChartSpec, ReportItem, Series};
use reportview::sanitize::{HtmlSanitizer, Sanitize};

fn create_spec(kind: ChartKind, points: usize) -> ChartSpec {
    let labels: Vec<String> = (0..points).map(|i| format!("P{}", i)).collect();
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let data: Vec<f64> = (0..points).map(|i| ((i * 37) % 100) as f64 + 1.0).collect();

    ChartSpec {
        title: "Bench".to_string(),
        kind,
        series: vec![Series::new("Series", &label_refs, &data)],
        colors: Vec::new(),
        y_scale: None,
        caption: Some("Generated".to_string()),
    }
}

fn bench_charts(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart");
    let renderer = ChartRenderer::new();

    for kind in [ChartKind::Bar, ChartKind::Line, ChartKind::Pie] {
        for size in [10, 100] {
            let spec = create_spec(kind, size);
            group.throughput(Throughput::Elements(size as u64));

            group.bench_function(format!("{:?}_{}", kind, size).to_lowercase(), |b| {
                let mut surface = RenderSurface::new("bench");
                b.iter(|| {
                    renderer.render(&mut surface, black_box(&spec)).unwrap();
                    surface.to_svg()
                })
            });
        }
    }

    group.finish();
}

fn bench_sanitize(c: &mut Criterion) {
    let sanitizer = HtmlSanitizer::new();
    let html = "<div onclick=\"x()\"><h2>Summary</h2><p>Revenue <strong>up</strong> 4%</p>\
                <script>steal()</script><a href=\"javascript:alert(1)\">link</a></div>"
        .repeat(20);

    c.bench_function("sanitize", |b| b.iter(|| sanitizer.sanitize(black_box(&html))));
}

fn bench_dispatch(c: &mut Criterion) {
    let dispatcher = Dispatcher::new(
        ChartRenderer::new(),
        Arc::new(HtmlSanitizer::new()),
        TracingLog::shared(),
    );
    let chart_data = serde_json::to_string(&create_spec(ChartKind::Bar, 12)).unwrap();

    let items: Vec<ReportItem> = (0..20)
        .map(|i| {
            if i % 2 == 0 {
                ReportItem::chart(format!("chart-{}", i), chart_data.as_str())
            } else {
                ReportItem::html("<p>Block</p>")
            }
        })
        .collect();

    let mut surfaces = SurfaceRegistry::new();
    for item in &items {
        if let Some(id) = item.chart_id() {
            surfaces.ensure(id);
        }
    }

    c.bench_function("dispatch_20_items", |b| {
        b.iter(|| dispatcher.dispatch(black_box(&items), &mut surfaces))
    });
}

criterion_group!(benches, bench_charts, bench_sanitize, bench_dispatch);
criterion_main!(benches);
