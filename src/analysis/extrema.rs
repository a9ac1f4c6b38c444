//! Classification of critical points.
//!
//! The second-derivative test decides whenever f''(c) is defined and non-zero. When it is
//! exactly zero the sign of f' is sampled at c - h and c + h; anything but a clean sign
//! change leaves the point inconclusive. An undefined f''(c) is inconclusive right away.
use crate::symbolic::symbolic_lambdify::NumericEvaluator;
use std::fmt;
use strum_macros::Display;

/// Offset of the sign-change fallback.
pub const SIGN_TEST_STEP: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InconclusiveReason {
    #[strum(serialize = "second derivative undefined")]
    SecondDerivativeUndefined,
    #[strum(serialize = "first derivative undefined near the point")]
    FirstDerivativeUndefined,
    #[strum(serialize = "no sign change")]
    NoSignChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumKind {
    LocalMin,
    LocalMax,
    Inconclusive(InconclusiveReason),
}

impl fmt::Display for ExtremumKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExtremumKind::LocalMin => write!(f, "local minimum"),
            ExtremumKind::LocalMax => write!(f, "local maximum"),
            ExtremumKind::Inconclusive(reason) => write!(f, "inconclusive ({})", reason),
        }
    }
}

/// Which test produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ClassificationMethod {
    #[strum(serialize = "second derivative")]
    SecondDerivative,
    #[strum(serialize = "sign change")]
    SignChange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtremumRecord {
    pub x: f64,
    pub kind: ExtremumKind,
    pub method: ClassificationMethod,
    /// f(x), `None` when f is undefined there
    pub value: Option<f64>,
    pub second_derivative: Option<f64>,
}

impl ExtremumRecord {
    pub fn is_extremum(&self) -> bool {
        matches!(self.kind, ExtremumKind::LocalMin | ExtremumKind::LocalMax)
    }
}

/// Sign-change test on f' around `c`.
fn sign_change_test(first_derivative: &NumericEvaluator, c: f64) -> ExtremumKind {
    let left = first_derivative.try_eval(c - SIGN_TEST_STEP);
    let right = first_derivative.try_eval(c + SIGN_TEST_STEP);
    match (left, right) {
        (Some(l), Some(r)) if l > 0.0 && r < 0.0 => ExtremumKind::LocalMax,
        (Some(l), Some(r)) if l < 0.0 && r > 0.0 => ExtremumKind::LocalMin,
        (Some(_), Some(_)) => ExtremumKind::Inconclusive(InconclusiveReason::NoSignChange),
        _ => ExtremumKind::Inconclusive(InconclusiveReason::FirstDerivativeUndefined),
    }
}

pub fn classify_point(
    c: f64,
    first_derivative: &NumericEvaluator,
    second_derivative: &NumericEvaluator,
    function: &NumericEvaluator,
) -> ExtremumRecord {
    let d2 = second_derivative.try_eval(c);
    let (kind, method) = match d2 {
        None => (
            ExtremumKind::Inconclusive(InconclusiveReason::SecondDerivativeUndefined),
            ClassificationMethod::SecondDerivative,
        ),
        Some(v) if v > 0.0 => (ExtremumKind::LocalMin, ClassificationMethod::SecondDerivative),
        Some(v) if v < 0.0 => (ExtremumKind::LocalMax, ClassificationMethod::SecondDerivative),
        Some(_) => (
            sign_change_test(first_derivative, c),
            ClassificationMethod::SignChange,
        ),
    };
    ExtremumRecord {
        x: c,
        kind,
        method,
        value: function.try_eval(c),
        second_derivative: d2,
    }
}

/// One record per critical point, in the same order.
pub fn classify_extrema(
    critical_points: &[f64],
    first_derivative: &NumericEvaluator,
    second_derivative: &NumericEvaluator,
    function: &NumericEvaluator,
) -> Vec<ExtremumRecord> {
    critical_points
        .iter()
        .map(|&c| classify_point(c, first_derivative, second_derivative, function))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;

    fn evaluators(text: &str) -> (NumericEvaluator, NumericEvaluator, NumericEvaluator) {
        let f = Expr::parse_expression(text, "x").unwrap();
        let df = f.diff("x");
        let d2f = df.diff("x");
        (
            df.lambdify1D("x").unwrap(),
            d2f.lambdify1D("x").unwrap(),
            f.lambdify1D("x").unwrap(),
        )
    }

    #[test]
    fn test_second_derivative_min_and_max() {
        let (df, d2f, f) = evaluators("x^3 - 3*x");
        let records = classify_extrema(&[-1.0, 1.0], &df, &d2f, &f);
        assert_eq!(records[0].kind, ExtremumKind::LocalMax);
        assert_eq!(records[0].value, Some(2.0));
        assert_eq!(records[1].kind, ExtremumKind::LocalMin);
        assert_eq!(records[1].value, Some(-2.0));
        assert!(
            records
                .iter()
                .all(|r| r.method == ClassificationMethod::SecondDerivative)
        );
    }

    #[test]
    fn test_fallback_sign_change() {
        // f''(0) = 0 for x^4, f' changes sign from - to +
        let (df, d2f, f) = evaluators("x^4");
        let record = classify_point(0.0, &df, &d2f, &f);
        assert_eq!(record.second_derivative, Some(0.0));
        assert_eq!(record.kind, ExtremumKind::LocalMin);
        assert_eq!(record.method, ClassificationMethod::SignChange);

        let (df, d2f, f) = evaluators("-x^4");
        assert_eq!(classify_point(0.0, &df, &d2f, &f).kind, ExtremumKind::LocalMax);
    }

    #[test]
    fn test_fallback_without_sign_change() {
        let (df, d2f, f) = evaluators("x^3");
        let record = classify_point(0.0, &df, &d2f, &f);
        assert_eq!(
            record.kind,
            ExtremumKind::Inconclusive(InconclusiveReason::NoSignChange)
        );
        assert_eq!(record.method, ClassificationMethod::SignChange);
        assert_eq!(record.value, Some(0.0));
        assert!(!record.is_extremum());
    }

    #[test]
    fn test_undefined_second_derivative() {
        let (df, d2f, f) = evaluators("1/x");
        let record = classify_point(0.0, &df, &d2f, &f);
        assert_eq!(
            record.kind,
            ExtremumKind::Inconclusive(InconclusiveReason::SecondDerivativeUndefined)
        );
        assert_eq!(record.value, None);
        assert_eq!(
            record.kind.to_string(),
            "inconclusive (second derivative undefined)"
        );
    }

    #[test]
    fn test_fallback_with_undefined_neighbour() {
        // f' undefined left of 0, f'' forced to zero to reach the fallback
        let df = Expr::parse_expression("x^(3/2)", "x").unwrap().lambdify1D("x").unwrap();
        let d2f = Expr::Const(0.0).lambdify1D("x").unwrap();
        let f = Expr::parse_expression("0.4*x^(5/2)", "x").unwrap().lambdify1D("x").unwrap();
        let record = classify_point(0.0, &df, &d2f, &f);
        assert_eq!(
            record.kind,
            ExtremumKind::Inconclusive(InconclusiveReason::FirstDerivativeUndefined)
        );
    }
}
