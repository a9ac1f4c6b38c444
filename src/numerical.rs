#![allow(non_snake_case)]
/// Critical points of a function of one variable: sampling of the first derivative,
/// sign-change brackets refined by Newton-Raphson/bisection, tangential zeros and
/// denominator zeros
/// # Example
/// ```
/// use RustedExtrema::analysis::config::AnalysisConfig;
/// use RustedExtrema::numerical::critical_points::find_critical_points;
/// use RustedExtrema::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x^3 - 3*x", "x").unwrap();
/// let df = f.diff("x");
/// let d2f = df.diff("x");
/// let cfg = AnalysisConfig::default();
/// let cps = find_critical_points(
///     &df.lambdify1D("x").unwrap(),
///     &d2f.lambdify1D("x").unwrap(),
///     &[],
///     &cfg,
/// );
/// assert_eq!(cps, vec![-1.0, 1.0]);
/// ```
pub mod critical_points;
/// Newton-Raphson and bisection for scalar equations
pub mod root_finding;
