//! End-to-end analysis of one function on a fixed domain.
//!
//! # Example
//! ```
//! use RustedExtrema::analysis::config::AnalysisConfig;
//! use RustedExtrema::analysis::pipeline::FunctionAnalyzer;
//! let analyzer = FunctionAnalyzer::new(AnalysisConfig::on_domain(-10.0, 10.0)).unwrap();
//! let report = analyzer.analyze("x^2").unwrap();
//! assert_eq!(report.critical_points, vec![0.0]);
//! println!("{}", report.summary_table());
//! ```
use crate::analysis::config::AnalysisConfig;
use crate::analysis::error::AnalysisResult;
use crate::analysis::extrema::{ExtremumRecord, classify_extrema};
use crate::analysis::intervals::{
    MonotonicInterval, MonotonicityLabel, breakpoints, classify_intervals,
};
use crate::Utils::logger::save_columns_to_csv;
use crate::numerical::critical_points::{find_critical_points, linspace};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::NumericEvaluator;
use log::{debug, info, warn};
use std::path::Path;
use std::time::Instant;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Runs the whole chain: parse, differentiate twice, compile, locate critical points,
/// label intervals and classify extrema. The configuration is validated once, in `new`.
#[derive(Debug, Clone)]
pub struct FunctionAnalyzer {
    config: AnalysisConfig,
}

impl FunctionAnalyzer {
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult<AnalysisReport> {
        let begin = Instant::now();
        let cfg = &self.config;
        let var = cfg.variable.as_str();
        info!(
            "analysing f({}) = {} on [{}, {}]",
            var, text, cfg.xmin, cfg.xmax
        );

        let expression = Expr::parse_expression(text, var)?;
        let first_derivative = expression.n_th_derivative1D(var, 1);
        let second_derivative = first_derivative.diff(var);
        info!("f' = {}", first_derivative);
        info!("f'' = {}", second_derivative);
        debug!(
            "tree sizes: f {}, f' {}, f'' {}",
            expression.node_count(),
            first_derivative.node_count(),
            second_derivative.node_count()
        );

        let function_eval = expression.lambdify1D(var)?;
        let first_derivative_eval = first_derivative.lambdify1D(var)?;
        let second_derivative_eval = second_derivative.lambdify1D(var)?;

        let denominator_zeros = first_derivative.denominator_zeros(var, (cfg.xmin, cfg.xmax));
        debug!("denominator zeros of f': {:?}", denominator_zeros);

        let critical_points = find_critical_points(
            &first_derivative_eval,
            &second_derivative_eval,
            &denominator_zeros,
            cfg,
        );
        info!("{} critical point(s) found", critical_points.len());

        let intervals = classify_intervals(
            &breakpoints(cfg, &critical_points),
            &first_derivative_eval,
            cfg.tol,
        );
        for interval in &intervals {
            if interval.label != MonotonicityLabel::Indeterminate {
                continue;
            }
            if interval.is_degenerate() {
                debug!("critical point {} lies on the domain boundary", interval.start);
            } else {
                warn!(
                    "f' is undefined at the midpoint of [{}, {}], interval left indeterminate",
                    interval.start, interval.end
                );
            }
        }

        let extrema = classify_extrema(
            &critical_points,
            &first_derivative_eval,
            &second_derivative_eval,
            &function_eval,
        );
        info!(
            "{} local extrema, analysis finished in {} ms",
            extrema.iter().filter(|e| e.is_extremum()).count(),
            begin.elapsed().as_millis()
        );

        Ok(AnalysisReport {
            function_latex: expression.to_latex(),
            first_derivative_latex: first_derivative.to_latex(),
            second_derivative_latex: second_derivative.to_latex(),
            expression,
            first_derivative,
            second_derivative,
            denominator_zeros,
            critical_points,
            intervals,
            extrema,
            function_eval,
            first_derivative_eval,
            second_derivative_eval,
            config: cfg.clone(),
        })
    }
}

/// One point of the sampled curves; `None` where the function is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSample {
    pub x: f64,
    pub f: Option<f64>,
    pub df: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub expression: Expr,
    pub first_derivative: Expr,
    pub second_derivative: Expr,
    pub function_latex: String,
    pub first_derivative_latex: String,
    pub second_derivative_latex: String,
    /// zeros of the denominator of f' inside the domain
    pub denominator_zeros: Vec<f64>,
    pub critical_points: Vec<f64>,
    pub intervals: Vec<MonotonicInterval>,
    pub extrema: Vec<ExtremumRecord>,
    pub function_eval: NumericEvaluator,
    pub first_derivative_eval: NumericEvaluator,
    pub second_derivative_eval: NumericEvaluator,
    pub config: AnalysisConfig,
}

#[derive(Tabled)]
struct IntervalRow {
    interval: String,
    behaviour: String,
}

#[derive(Tabled)]
struct ExtremumRow {
    x: String,
    #[tabled(rename = "f(x)")]
    value: String,
    #[tabled(rename = "f''(x)")]
    second_derivative: String,
    kind: String,
    test: String,
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| format!("{:.6}", v))
}

impl AnalysisReport {
    /// f and f' on `n` evenly spaced points of the domain.
    pub fn plot_samples(&self, n: usize) -> Vec<PlotSample> {
        linspace(self.config.xmin, self.config.xmax, n)
            .into_iter()
            .map(|x| PlotSample {
                x,
                f: self.function_eval.try_eval(x),
                df: self.first_derivative_eval.try_eval(x),
            })
            .collect()
    }

    /// Writes `plot_samples(n)` to `path` with columns `x`, `f`, `df`; undefined values
    /// are empty cells.
    pub fn save_samples_csv(&self, path: &Path, n: usize) -> AnalysisResult<()> {
        let rows: Vec<Vec<Option<f64>>> = self
            .plot_samples(n)
            .into_iter()
            .map(|s| vec![Some(s.x), s.f, s.df])
            .collect();
        save_columns_to_csv(path, &["x", "f", "df"], &rows)?;
        info!("{} samples written to {}", n, path.display());
        Ok(())
    }

    pub fn intervals_table(&self) -> Table {
        let rows: Vec<IntervalRow> = self
            .intervals
            .iter()
            .map(|i| IntervalRow {
                interval: format!("({:.6}, {:.6})", i.start, i.end),
                behaviour: i.label.to_string(),
            })
            .collect();
        let mut table = Table::new(&rows);
        table.with(Style::modern_rounded());
        table
    }

    pub fn extrema_table(&self) -> Table {
        let rows: Vec<ExtremumRow> = self
            .extrema
            .iter()
            .map(|e| ExtremumRow {
                x: format!("{:.6}", e.x),
                value: fmt_value(e.value),
                second_derivative: fmt_value(e.second_derivative),
                kind: e.kind.to_string(),
                test: e.method.to_string(),
            })
            .collect();
        let mut table = Table::new(&rows);
        table.with(Style::modern_rounded());
        table
    }

    /// Text report: derivatives, critical points, intervals and extrema.
    pub fn summary_table(&self) -> String {
        let cps = if self.critical_points.is_empty() {
            "none".to_string()
        } else {
            self.critical_points
                .iter()
                .map(|c| format!("{:.6}", c))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut out = String::new();
        out.push_str(&format!("f = {}\n", self.expression));
        out.push_str(&format!("f' = {}\n", self.first_derivative));
        out.push_str(&format!("f'' = {}\n", self.second_derivative));
        out.push_str(&format!("critical points: {}\n", cps));
        out.push_str("\nMONOTONICITY\n");
        out.push_str(&self.intervals_table().to_string());
        if !self.extrema.is_empty() {
            out.push_str("\n\nEXTREMA\n");
            out.push_str(&self.extrema_table().to_string());
        }
        out.push('\n');
        out
    }
}
