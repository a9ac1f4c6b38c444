//! # Symbolic Engine Derivatives Module
//!
//! Analytical differentiation of [`Expr`] trees. Every node kind has its own rule and
//! `diff` only dispatches on the kind:
//! - sum and difference rules
//! - product rule: d/dx(f*g) = f'*g + f*g'
//! - quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
//! - power rule in three flavours: constant exponent, constant base and the general
//!   case d/dx(f^g) = f^g * (g'*ln(f) + g*f'/f)
//! - chain rule for every named function
//!
//! `diff` is pure and total: it never fails, an expression that cannot be evaluated
//! somewhere still has a derivative tree and the evaluation problem shows up only when
//! the derivative is compiled and evaluated.
use crate::symbolic::symbolic_engine::Expr;

fn c(val: f64) -> Expr {
    Expr::Const(val)
}

fn d_product(lhs: &Expr, rhs: &Expr, var: &str) -> Expr {
    lhs.diff_raw(var) * rhs.clone() + lhs.clone() * rhs.diff_raw(var)
}

fn d_quotient(lhs: &Expr, rhs: &Expr, var: &str) -> Expr {
    (lhs.diff_raw(var) * rhs.clone() - lhs.clone() * rhs.diff_raw(var))
        / rhs.clone().pow(c(2.0))
}

fn d_power(base: &Expr, exp: &Expr, var: &str) -> Expr {
    let base_depends = base.contains_variable(var);
    let exp_depends = exp.contains_variable(var);
    match (base_depends, exp_depends) {
        (false, false) => c(0.0),
        // n * f^(n-1) * f'
        (true, false) => {
            exp.clone() * base.clone().pow(exp.clone() - c(1.0)) * base.diff_raw(var)
        }
        // a^g * ln(a) * g'
        (false, true) => {
            base.clone().pow(exp.clone()) * base.clone().ln() * exp.diff_raw(var)
        }
        // f^g * (g' ln f + g f'/f)
        (true, true) => {
            base.clone().pow(exp.clone())
                * (exp.diff_raw(var) * base.clone().ln()
                    + exp.clone() * base.diff_raw(var) / base.clone())
        }
    }
}

/// Outer derivative of a named function evaluated at its argument `u`; the caller
/// multiplies by u'.
fn d_outer(func: &Expr, u: &Expr) -> Expr {
    let u = u.clone();
    let one_minus_u2 = c(1.0) - u.clone().pow(c(2.0));
    let one_plus_u2 = c(1.0) + u.clone().pow(c(2.0));
    match func {
        Expr::Exp(_) => u.exp(),
        Expr::Ln(_) => c(1.0) / u,
        Expr::sin(_) => Expr::cos(u.boxed()),
        Expr::cos(_) => -Expr::sin(u.boxed()),
        Expr::tg(_) => c(1.0) / Expr::cos(u.boxed()).pow(c(2.0)),
        Expr::ctg(_) => c(-1.0) / Expr::sin(u.boxed()).pow(c(2.0)),
        Expr::arcsin(_) => c(1.0) / one_minus_u2.pow(c(0.5)),
        Expr::arccos(_) => c(-1.0) / one_minus_u2.pow(c(0.5)),
        Expr::arctg(_) => c(1.0) / one_plus_u2,
        Expr::arcctg(_) => c(-1.0) / one_plus_u2,
        _ => c(0.0),
    }
}

impl Expr {
    /// Derivative tree exactly as the rules produce it, without simplification.
    pub fn diff_raw(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    c(1.0)
                } else {
                    c(0.0)
                }
            }
            Expr::Const(_) => c(0.0),
            Expr::Add(lhs, rhs) => lhs.diff_raw(var) + rhs.diff_raw(var),
            Expr::Sub(lhs, rhs) => lhs.diff_raw(var) - rhs.diff_raw(var),
            Expr::Mul(lhs, rhs) => d_product(lhs, rhs, var),
            Expr::Div(lhs, rhs) => d_quotient(lhs, rhs, var),
            Expr::Pow(base, exp) => d_power(base, exp, var),
            func => match func.function_argument() {
                Some(u) => d_outer(func, u) * u.diff_raw(var),
                None => c(0.0),
            },
        }
    }

    /// Computes the analytical derivative with respect to `var` and simplifies it.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x^2", "x").unwrap();
    /// assert_eq!(f.diff("x"), Expr::Const(2.0) * Expr::var("x"));
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        self.diff_raw(var).simplify()
    }

    /// nth derivative, simplified after every step
    pub fn n_th_derivative1D(&self, var_name: &str, n: usize) -> Expr {
        (0..n).fold(self.simplify(), |expr, _| expr.diff(var_name))
    }
}
