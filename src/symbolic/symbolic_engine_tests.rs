use crate::symbolic::error::{ParseError, SymbolicError};
use crate::symbolic::symbolic_engine::Expr;
use approx::assert_relative_eq;
//___________________________________TESTS____________________________________

/// maximum deviation between the analytical derivative and a central difference on a
/// linspace, only over points where both are defined
fn compare_num1D(expr: &Expr, start: f64, end: f64, num_values: usize) -> f64 {
    let f = expr.lambdify1D("x").unwrap();
    let df = expr.diff("x").lambdify1D("x").unwrap();
    let h = 1e-6;
    (0..num_values)
        .map(|i| start + (end - start) * i as f64 / (num_values - 1) as f64)
        .filter_map(|x| {
            let analytical = df.try_eval(x)?;
            let numerical = (f.try_eval(x + h)? - f.try_eval(x - h)?) / (2.0 * h);
            Some((analytical - numerical).abs() / analytical.abs().max(1.0))
        })
        .fold(0.0, f64::max)
}

#[test]
fn test_parse_diff_lambdify_pipeline() {
    let f = Expr::parse_expression("x^2", "x").unwrap();
    let df = f.diff("x");
    let d2f = df.diff("x");
    assert_eq!(df.to_string(), "(2 * x)");
    assert_eq!(d2f, Expr::Const(2.0));
    let df = df.lambdify1D("x").unwrap();
    assert_eq!(df.eval(3.0), 6.0);
}

#[test]
fn test_sin_derivatives_display() {
    let f = Expr::parse_expression("sin(x)", "x").unwrap();
    assert_eq!(f.diff("x").to_string(), "cos(x)");
    assert_eq!(f.n_th_derivative1D("x", 2).to_string(), "(-1 * sin(x))");
}

#[test]
fn test_reciprocal_derivatives() {
    let f = Expr::parse_expression("1/x", "x").unwrap();
    let df = f.diff("x");
    assert_eq!(df.to_string(), "(-1 / (x ^ 2))");
    let d2f = df.diff("x").lambdify1D("x").unwrap();
    assert_eq!(d2f.try_eval(0.0), None);
    assert_relative_eq!(d2f.eval(1.0), 2.0, epsilon = 1e-12);
}

#[test]
fn test_compare_analytical_and_numerical_derivatives() {
    let cases = [
        ("x^3 - 3*x + 1", -3.0, 3.0),
        ("exp(-x^2/2)", -3.0, 3.0),
        ("x*ln(x)", 0.1, 5.0),
        ("sin(x)*cos(2*x)", 0.0, 6.0),
        ("(x^2 + 1)/(x - 2)", -1.0, 1.5),
        ("atan(x) + sqrt(x^2 + 1)", -4.0, 4.0),
        ("x^(1/3)", 0.1, 1.0),
    ];
    for (text, start, end) in cases {
        let f = Expr::parse_expression(text, "x").unwrap();
        let max_norm = compare_num1D(&f, start, end, 50);
        assert!(max_norm < 1e-5, "{}: deviation {}", text, max_norm);
    }
}

#[test]
fn test_derivative_keeps_single_variable() {
    let f = Expr::parse_expression("t^2*exp(t)", "t").unwrap();
    let df = f.diff("t");
    assert_eq!(df.all_arguments_are_variables(), vec!["t"]);
    assert!(df.lambdify1D("t").is_ok());
    assert_eq!(
        df.lambdify1D("x"),
        Err(SymbolicError::UnboundVariable {
            name: "t".to_string(),
            expected: "x".to_string()
        })
    );
}

#[test]
fn test_parse_error_surfaces() {
    assert_eq!(
        Expr::parse_expression("x +* 2", "x"),
        Err(ParseError::Unexpected {
            position: 2,
            fragment: "+* 2".to_string()
        })
    );
}

#[test]
fn test_pure_operations_do_not_mutate() {
    let f = Expr::parse_expression("x^3", "x").unwrap();
    let snapshot = f.clone();
    let _ = f.diff("x");
    let _ = f.simplify();
    let _ = f.to_latex();
    let _ = f.denominator_zeros("x", (-1.0, 1.0));
    assert_eq!(f, snapshot);
}
