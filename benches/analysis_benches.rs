use RustedExtrema::analysis::config::AnalysisConfig;
use RustedExtrema::analysis::pipeline::FunctionAnalyzer;
use RustedExtrema::symbolic::symbolic_engine::Expr;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_scenarios(c: &mut Criterion) {
    let mut group = c.benchmark_group("full analysis");
    let scenarios = [
        ("x^2", -10.0, 10.0),
        ("x^3", -5.0, 5.0),
        ("sin(x)", 0.0, 20.0),
        ("1/x", -5.0, 5.0),
    ];
    for (text, xmin, xmax) in scenarios {
        let analyzer = FunctionAnalyzer::new(AnalysisConfig::on_domain(xmin, xmax)).unwrap();
        group.bench_function(text, |b| b.iter(|| analyzer.analyze(black_box(text))));
    }
    group.finish();
}

fn bench_evaluator(c: &mut Criterion) {
    let f = Expr::parse_expression("sin(x)*exp(-x^2/10) + ln(x^2 + 1)", "x").unwrap();
    let df = f.diff("x").lambdify1D("x").unwrap();
    let xs: Vec<f64> = (0..800).map(|i| -10.0 + 20.0 * i as f64 / 799.0).collect();
    c.bench_function("derivative on 800 samples", |b| {
        b.iter(|| df.eval_many(black_box(&xs)))
    });
}

criterion_group!(benches, bench_scenarios, bench_evaluator);
criterion_main!(benches);
