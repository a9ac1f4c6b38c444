//! Monotonicity of f between consecutive breakpoints (domain ends and critical points).
//! The sign of f' at the midpoint decides the label, so one evaluation per interval.
//! A zero-width interval (critical point on a domain end) has no interior and is
//! labelled indeterminate.
use crate::analysis::config::AnalysisConfig;
use crate::symbolic::symbolic_lambdify::NumericEvaluator;
use itertools::Itertools;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MonotonicityLabel {
    Increasing,
    Decreasing,
    Constant,
    /// f' undefined at the midpoint, or an empty interval
    Indeterminate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonotonicInterval {
    pub start: f64,
    pub end: f64,
    pub label: MonotonicityLabel,
}

impl MonotonicInterval {
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.start + self.end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// `[xmin] + critical_points + [xmax]`
pub fn breakpoints(cfg: &AnalysisConfig, critical_points: &[f64]) -> Vec<f64> {
    std::iter::once(cfg.xmin)
        .chain(critical_points.iter().copied())
        .chain(std::iter::once(cfg.xmax))
        .collect()
}

/// Label for the value of f' at a sample point.
pub fn label_for(derivative: Option<f64>, tol: f64) -> MonotonicityLabel {
    match derivative {
        None => MonotonicityLabel::Indeterminate,
        Some(v) if v.abs() <= tol => MonotonicityLabel::Constant,
        Some(v) if v > tol => MonotonicityLabel::Increasing,
        Some(_) => MonotonicityLabel::Decreasing,
    }
}

/// One labelled interval per consecutive pair of `breakpoints`.
pub fn classify_intervals(
    breakpoints: &[f64],
    first_derivative: &NumericEvaluator,
    tol: f64,
) -> Vec<MonotonicInterval> {
    breakpoints
        .iter()
        .tuple_windows()
        .map(|(&start, &end)| {
            let mut interval = MonotonicInterval {
                start,
                end,
                label: MonotonicityLabel::Indeterminate,
            };
            if !interval.is_degenerate() {
                interval.label = label_for(first_derivative.try_eval(interval.midpoint()), tol);
            }
            interval
        })
        .collect()
}
