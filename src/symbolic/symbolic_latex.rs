//! LaTeX rendering of expressions, used to print derivatives in a form ready for a
//! report or a notebook. Parentheses are emitted only where operator precedence needs
//! them.
use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::{E, PI};

const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_POWER: u8 = 3;
const PREC_ATOM: u8 = 4;

fn paren(body: String) -> String {
    format!("\\left({}\\right)", body)
}

fn number(val: f64) -> String {
    if val == PI {
        "\\pi".to_string()
    } else if val == E {
        "e".to_string()
    } else {
        format!("{}", val)
    }
}

fn function(name: &str, arg: &Expr) -> String {
    format!("{}{}", name, paren(arg.to_latex()))
}

impl Expr {
    /// LaTeX source of the expression.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("-1/x^2", "x").unwrap();
    /// assert_eq!(f.to_latex(), "\\frac{-1}{x^{2}}");
    /// ```
    pub fn to_latex(&self) -> String {
        self.latex_with_precedence().0
    }

    /// Renders `self` and wraps it when its precedence is below `min_prec`.
    fn latex_operand(&self, min_prec: u8) -> String {
        let (body, prec) = self.latex_with_precedence();
        if prec < min_prec { paren(body) } else { body }
    }

    fn latex_with_precedence(&self) -> (String, u8) {
        match self {
            Expr::Var(name) => (name.clone(), PREC_ATOM),
            Expr::Const(val) if *val < 0.0 => (number(*val), PREC_SUM),
            Expr::Const(val) => (number(*val), PREC_ATOM),
            Expr::Add(lhs, rhs) => (
                format!(
                    "{} + {}",
                    lhs.latex_operand(PREC_SUM),
                    rhs.latex_operand(PREC_PRODUCT)
                ),
                PREC_SUM,
            ),
            Expr::Sub(lhs, rhs) => (
                format!(
                    "{} - {}",
                    lhs.latex_operand(PREC_SUM),
                    rhs.latex_operand(PREC_PRODUCT)
                ),
                PREC_SUM,
            ),
            Expr::Mul(lhs, rhs) if lhs.as_const() == Some(-1.0) => {
                (format!("-{}", rhs.latex_operand(PREC_PRODUCT)), PREC_SUM)
            }
            Expr::Mul(lhs, rhs) => {
                let left = match lhs.as_ref() {
                    // a leading negative coefficient needs no parentheses
                    Expr::Const(val) => number(*val),
                    other => other.latex_operand(PREC_PRODUCT),
                };
                (
                    format!("{} \\cdot {}", left, rhs.latex_operand(PREC_PRODUCT)),
                    PREC_PRODUCT,
                )
            }
            Expr::Div(lhs, rhs) => (
                format!("\\frac{{{}}}{{{}}}", lhs.to_latex(), rhs.to_latex()),
                PREC_ATOM,
            ),
            Expr::Pow(base, exp) if exp.as_const() == Some(0.5) => {
                (format!("\\sqrt{{{}}}", base.to_latex()), PREC_ATOM)
            }
            Expr::Pow(base, exp) => (
                format!(
                    "{}^{{{}}}",
                    base.latex_operand(PREC_ATOM),
                    exp.to_latex()
                ),
                PREC_POWER,
            ),
            Expr::Exp(arg) => (format!("e^{{{}}}", arg.to_latex()), PREC_POWER),
            Expr::Ln(arg) => (function("\\ln", arg), PREC_ATOM),
            Expr::sin(arg) => (function("\\sin", arg), PREC_ATOM),
            Expr::cos(arg) => (function("\\cos", arg), PREC_ATOM),
            Expr::tg(arg) => (function("\\tan", arg), PREC_ATOM),
            Expr::ctg(arg) => (function("\\cot", arg), PREC_ATOM),
            Expr::arcsin(arg) => (function("\\arcsin", arg), PREC_ATOM),
            Expr::arccos(arg) => (function("\\arccos", arg), PREC_ATOM),
            Expr::arctg(arg) => (function("\\arctan", arg), PREC_ATOM),
            Expr::arcctg(arg) => (function("\\operatorname{arccot}", arg), PREC_ATOM),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latex(text: &str) -> String {
        Expr::parse_expression(text, "x").unwrap().to_latex()
    }

    #[test]
    fn test_latex_basic() {
        assert_eq!(latex("x + 1"), "x + 1");
        assert_eq!(latex("2*x"), "2 \\cdot x");
        assert_eq!(latex("x^2"), "x^{2}");
        assert_eq!(latex("1/x"), "\\frac{1}{x}");
    }

    #[test]
    fn test_latex_precedence() {
        assert_eq!(latex("(x + 1)*(x - 1)"), "\\left(x + 1\\right) \\cdot \\left(x - 1\\right)");
        assert_eq!(latex("x - (x + 1)"), "x - \\left(x + 1\\right)");
        assert_eq!(latex("(x + 1)^2"), "\\left(x + 1\\right)^{2}");
    }

    #[test]
    fn test_latex_functions() {
        assert_eq!(latex("sin(x)"), "\\sin\\left(x\\right)");
        assert_eq!(latex("sqrt(x)"), "\\sqrt{x}");
        assert_eq!(latex("exp(2*x)"), "e^{2 \\cdot x}");
        assert_eq!(latex("pi*x"), "\\pi \\cdot x");
    }

    #[test]
    fn test_latex_derivatives() {
        let df = Expr::parse_expression("sin(x)", "x").unwrap().n_th_derivative1D("x", 2);
        assert_eq!(df.to_latex(), "-\\sin\\left(x\\right)");
        let df = Expr::parse_expression("1/x", "x").unwrap().diff("x");
        assert_eq!(df.to_latex(), "\\frac{-1}{x^{2}}");
    }
}
