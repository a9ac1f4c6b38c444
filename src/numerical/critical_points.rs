//! Critical points of f on [xmin, xmax]: zeros of f' found by sampling plus refinement,
//! and points where f' is undefined because its denominator vanishes.
//!
//! 1. f' is sampled on an even grid, undefined samples become NaN and break brackets.
//! 2. Exact zeros on the grid are taken as they are; a strict sign change between two
//!    samples is refined by Newton-Raphson from the midpoint with f'' as the Jacobian, with
//!    40 halvings of the bracket as the fallback.
//! 3. Zeros of even multiplicity never change sign, they show up as an interior local
//!    minimum of |f'| on the grid. Newton-Raphson on f'/f'' refines them, since every
//!    zero of f' is a simple zero of that ratio whatever its multiplicity.
//! 4. Denominator zeros inside the domain are merged in.
//! 5. Candidates are rounded to 12 decimals, clamped to the domain, sorted and deduplicated.
use crate::analysis::config::AnalysisConfig;
use crate::numerical::root_finding::{FunctionWithDerivative, NonlinearFunction, ScalarRootFinder};
use crate::symbolic::symbolic_lambdify::NumericEvaluator;
use itertools::Itertools;
use log::{debug, trace};

/// Slack allowed for a refined root to fall outside the domain.
const DOMAIN_SLACK: f64 = 1e-8;
const ROUNDING_SCALE: f64 = 1e12;

/// `n` evenly spaced points from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Rounds to 12 decimals; `-0.0` comes out as `0.0`.
pub fn round12(x: f64) -> f64 {
    (x * ROUNDING_SCALE).round() / ROUNDING_SCALE + 0.0
}

/// Sorted, deduplicated critical points of the function whose first and second
/// derivatives are `first_derivative` and `second_derivative`.
pub fn find_critical_points(
    first_derivative: &NumericEvaluator,
    second_derivative: &NumericEvaluator,
    denominator_zeros: &[f64],
    cfg: &AnalysisConfig,
) -> Vec<f64> {
    let xs = linspace(cfg.xmin, cfg.xmax, cfg.samples);
    let ds = first_derivative.eval_many(&xs);
    let function = FunctionWithDerivative::new(
        |x: f64| first_derivative.eval(x),
        |x: f64| second_derivative.eval(x),
        "f'".to_string(),
    );
    let solver = ScalarRootFinder::new();
    let window = (cfg.xmin - DOMAIN_SLACK, cfg.xmax + DOMAIN_SLACK);

    let mut candidates = Vec::new();
    for ((&a, &da), (&b, &db)) in xs.iter().zip(&ds).tuple_windows() {
        if da.is_nan() || db.is_nan() {
            continue;
        }
        if da == 0.0 {
            candidates.push(a);
        } else if da * db < 0.0 {
            match solver.solve(&function, (a, b), window) {
                Ok(result) => candidates.push(result.root),
                Err(err) => debug!("bracket [{}, {}] dropped: {}", a, b, err),
            }
        }
    }
    if let (Some(&x_last), Some(&d_last)) = (xs.last(), ds.last()) {
        if d_last == 0.0 {
            candidates.push(x_last);
        }
    }

    let ratio = DerivativeRatio {
        first_derivative,
        second_derivative,
    };
    let tangential = tangential_zeros(&xs, &ds, &solver, &ratio, first_derivative, cfg.tol);
    trace!("tangential zeros {:?}", tangential);
    candidates.extend(tangential);

    candidates.extend(
        denominator_zeros
            .iter()
            .copied()
            .filter(|z| *z >= cfg.xmin && *z <= cfg.xmax),
    );

    let critical_points: Vec<f64> = candidates
        .into_iter()
        .filter(|x| x.is_finite())
        .map(|x| round12(x).clamp(cfg.xmin, cfg.xmax))
        .sorted_by(f64::total_cmp)
        .dedup()
        .collect();
    debug!("critical points {:?}", critical_points);
    critical_points
}

/// f'/f''. Its zeros are the zeros of f' with multiplicity one, so Newton-Raphson keeps
/// converging quadratically where it would crawl on f' itself.
struct DerivativeRatio<'a> {
    first_derivative: &'a NumericEvaluator,
    second_derivative: &'a NumericEvaluator,
}

impl NonlinearFunction for DerivativeRatio<'_> {
    fn evaluate(&self, x: f64) -> f64 {
        let d = self.first_derivative.eval(x);
        if d == 0.0 {
            0.0
        } else {
            d / self.second_derivative.eval(x)
        }
    }

    fn name(&self) -> &str {
        "f'/f''"
    }
}

/// Zeros of f' touched but not crossed by the grid.
fn tangential_zeros(
    xs: &[f64],
    ds: &[f64],
    solver: &ScalarRootFinder,
    ratio: &DerivativeRatio,
    first_derivative: &NumericEvaluator,
    tol: f64,
) -> Vec<f64> {
    let mut zeros = Vec::new();
    for i in 1..xs.len().saturating_sub(1) {
        let (l, m, r) = (ds[i - 1], ds[i], ds[i + 1]);
        if l.is_nan() || m.is_nan() || r.is_nan() {
            continue;
        }
        let same_sign = l * m > 0.0 && m * r > 0.0;
        let local_min = m.abs() <= l.abs()
            && m.abs() <= r.abs()
            && (m.abs() < l.abs() || m.abs() < r.abs());
        if !(same_sign && local_min) {
            continue;
        }
        let Ok(result) = solver.newton_raphson(ratio, xs[i]) else {
            continue;
        };
        let root = result.root;
        let inside_window = root >= xs[i - 1] && root <= xs[i + 1];
        let small = first_derivative
            .try_eval(root)
            .is_some_and(|v| v.abs() <= tol);
        if inside_window && small {
            zeros.push(root);
        }
    }
    zeros
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn derivatives(text: &str) -> (NumericEvaluator, NumericEvaluator, Vec<f64>, Expr) {
        let f = Expr::parse_expression(text, "x").unwrap();
        let df = f.diff("x");
        let d2f = df.diff("x");
        (
            df.lambdify1D("x").unwrap(),
            d2f.lambdify1D("x").unwrap(),
            Vec::new(),
            df,
        )
    }

    fn config(xmin: f64, xmax: f64) -> AnalysisConfig {
        AnalysisConfig {
            xmin,
            xmax,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(2.0, 3.0, 0).is_empty());
    }

    #[test]
    fn test_round12() {
        assert_eq!(round12(1.23456789012345), 1.234567890123);
        assert!(round12(-1e-14).is_sign_positive());
        assert_eq!(round12(-1e-14), 0.0);
    }

    #[test]
    fn test_parabola_vertex() {
        let (df, d2f, den, _) = derivatives("x^2");
        let cps = find_critical_points(&df, &d2f, &den, &config(-10.0, 10.0));
        assert_eq!(cps, vec![0.0]);
    }

    #[test]
    fn test_shifted_parabola() {
        let (df, d2f, den, _) = derivatives("(x - 1.3)^2");
        let cps = find_critical_points(&df, &d2f, &den, &config(-10.0, 10.0));
        assert_eq!(cps.len(), 1);
        assert_relative_eq!(cps[0], 1.3, epsilon = 1e-12);
    }

    #[test]
    fn test_cubic_tangential_zero() {
        let (df, d2f, den, _) = derivatives("x^3");
        let cps = find_critical_points(&df, &d2f, &den, &config(-5.0, 5.0));
        assert_eq!(cps, vec![0.0]);
    }

    #[test]
    fn test_high_multiplicity_tangential_zeros() {
        for text in ["x^5", "x^7", "x^9", "-x^7"] {
            let (df, d2f, den, _) = derivatives(text);
            let cps = find_critical_points(&df, &d2f, &den, &config(-5.0, 5.0));
            assert_eq!(cps, vec![0.0], "{}", text);
        }
        let (df, d2f, den, _) = derivatives("(x - 1)^7");
        assert_eq!(
            find_critical_points(&df, &d2f, &den, &config(-5.0, 5.0)),
            vec![1.0]
        );
    }

    #[test]
    fn test_sine_critical_points() {
        let (df, d2f, den, _) = derivatives("sin(x)");
        let cps = find_critical_points(&df, &d2f, &den, &config(0.0, 20.0));
        assert_eq!(cps.len(), 6);
        for (k, cp) in cps.iter().enumerate() {
            assert_relative_eq!(*cp, PI / 2.0 + k as f64 * PI, epsilon = 1e-11);
        }
    }

    #[test]
    fn test_reciprocal_only_denominator_zero() {
        let (df, d2f, _, df_expr) = derivatives("1/x");
        let den = df_expr.denominator_zeros("x", (-5.0, 5.0));
        assert!(find_critical_points(&df, &d2f, &[], &config(-5.0, 5.0)).is_empty());
        let cps = find_critical_points(&df, &d2f, &den, &config(-5.0, 5.0));
        assert_eq!(cps, vec![0.0]);
    }

    #[test]
    fn test_denominator_zeros_outside_domain_are_ignored() {
        let (df, d2f, _, _) = derivatives("x^2");
        let cps = find_critical_points(&df, &d2f, &[-20.0, 3.5, 40.0], &config(-10.0, 10.0));
        assert_eq!(cps, vec![0.0, 3.5]);
    }

    #[test]
    fn test_exact_zero_on_last_sample() {
        let (df, d2f, den, _) = derivatives("x^2");
        let cfg = AnalysisConfig {
            xmin: -4.0,
            xmax: 0.0,
            samples: 5,
            ..AnalysisConfig::default()
        };
        assert_eq!(find_critical_points(&df, &d2f, &den, &cfg), vec![0.0]);
    }

    #[test]
    fn test_no_critical_points_for_monotone_function() {
        let (df, d2f, den, _) = derivatives("x^3 + x");
        assert!(find_critical_points(&df, &d2f, &den, &config(-10.0, 10.0)).is_empty());
    }

    #[test]
    fn test_undefined_region_breaks_brackets() {
        // sqrt is undefined left of 0, the derivative 1 - x^(-1/2) has its zero at 1
        let (df, d2f, den, _) = derivatives("x - 2*sqrt(x)");
        let cps = find_critical_points(&df, &d2f, &den, &config(-3.0, 3.0));
        assert_eq!(cps.len(), 1);
        assert_relative_eq!(cps[0], 1.0, epsilon = 1e-12);
    }

    fn compiled(text: &str) -> NumericEvaluator {
        Expr::parse_expression(text, "x").unwrap().lambdify1D("x").unwrap()
    }

    #[test]
    fn test_newton_leaving_domain_falls_back_to_bisection() {
        // f' = atan(x); from the midpoint 2.5 of the only bracket Newton diverges
        let df = compiled("atan(x)");
        let d2f = compiled("1/(1 + x^2)");
        let newton = ScalarRootFinder::new().newton_raphson(
            &FunctionWithDerivative::new(|x| df.eval(x), |x| d2f.eval(x), "f'".to_string()),
            2.5,
        );
        assert!(newton.map_or(true, |r| r.root < -2.0 || r.root > 7.0));

        let cfg = AnalysisConfig {
            samples: 2,
            ..config(-2.0, 7.0)
        };
        let cps = find_critical_points(&df, &d2f, &[], &cfg);
        assert_eq!(cps.len(), 1);
        assert!(cps[0].abs() < 1e-11);
    }

    #[test]
    fn test_bracket_around_pole_is_dropped() {
        // f' = 1/x changes sign across the pole at the bracket midpoint
        let df = compiled("1/x");
        let d2f = compiled("-1/x^2");
        let cfg = AnalysisConfig {
            samples: 2,
            ..config(-1.0, 1.0)
        };
        assert!(find_critical_points(&df, &d2f, &[], &cfg).is_empty());
        assert_eq!(find_critical_points(&df, &d2f, &[0.0], &cfg), vec![0.0]);
    }
}
