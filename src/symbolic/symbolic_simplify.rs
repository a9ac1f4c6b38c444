//! # Symbolic Expression Simplification Module
//!
//! Algebraic clean-up of expression trees, mostly of the output of the derivative rules
//! which is full of `0 * f`, `f * 1` and `x^(2 - 1)` fragments.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic on numerical constants and named functions of a
//!    constant argument, as long as the result stays finite
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, x * 0 = 0, x^1 = x, x^0 = 1, x - x = 0
//! 3. **Power Rules**: x^a * x^b = x^(a+b), x^a / x^b = x^(a-b), x * x = x^2
//! 4. **Constant Collection**: constants are moved to the front of products and merged,
//!    (2 * x) * 3 = 6 * x
//! 5. **Sign Handling**: a + (-1)*b = a - b, a - (-1)*b = a + b, 0 - b = (-1)*b
//!
//! One bottom-up pass can expose new opportunities for its parent, so `simplify` repeats
//! passes until the tree stops changing (bounded by `MAX_PASSES`).
//!
//! Simplification never changes the value of the expression at points where both the
//! original and the simplified tree are defined; it may extend the domain (0 * ln(x)
//! becomes 0).

use crate::symbolic::symbolic_engine::Expr;

const MAX_PASSES: usize = 16;

fn fold_finite(val: f64) -> Option<Expr> {
    if val.is_finite() { Some(Expr::Const(val)) } else { None }
}

/// Evaluates a named function of a constant argument.
fn fold_function(func: &Expr, arg: f64) -> Option<Expr> {
    let val = match func {
        Expr::Exp(_) => arg.exp(),
        Expr::Ln(_) => arg.ln(),
        Expr::sin(_) => arg.sin(),
        Expr::cos(_) => arg.cos(),
        Expr::tg(_) => arg.tan(),
        Expr::ctg(_) => 1.0 / arg.tan(),
        Expr::arcsin(_) => arg.asin(),
        Expr::arccos(_) => arg.acos(),
        Expr::arctg(_) => arg.atan(),
        Expr::arcctg(_) => std::f64::consts::FRAC_PI_2 - arg.atan(),
        _ => return None,
    };
    fold_finite(val)
}

/// Splits `c * e` into (c, e); anything else is (1, expr).
fn split_coefficient(expr: &Expr) -> (f64, Expr) {
    match expr {
        Expr::Mul(lhs, rhs) => match lhs.as_ref() {
            Expr::Const(c) => (*c, (**rhs).clone()),
            _ => (1.0, expr.clone()),
        },
        _ => (1.0, expr.clone()),
    }
}

/// Base and exponent of a power, a bare factor is factor^1.
fn as_power(expr: &Expr) -> (Expr, Expr) {
    match expr {
        Expr::Pow(base, exp) => ((**base).clone(), (**exp).clone()),
        other => (other.clone(), Expr::Const(1.0)),
    }
}

fn simplify_add(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
        (Expr::Const(a), _) if *a == 0.0 => rhs,
        (_, Expr::Const(b)) if *b == 0.0 => lhs,
        // a + (-1)*b = a - b
        (_, Expr::Mul(factor, inner)) if factor.as_const() == Some(-1.0) => {
            simplify_sub(lhs.clone(), (**inner).clone())
        }
        _ => {
            // like terms: c1*e + c2*e = (c1 + c2)*e
            let (c1, e1) = split_coefficient(&lhs);
            let (c2, e2) = split_coefficient(&rhs);
            if e1 == e2 {
                simplify_mul(Expr::Const(c1 + c2), e1)
            } else {
                Expr::Add(lhs.boxed(), rhs.boxed())
            }
        }
    }
}

fn simplify_sub(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
        (_, Expr::Const(b)) if *b == 0.0 => lhs,
        (Expr::Const(a), _) if *a == 0.0 => simplify_mul(Expr::Const(-1.0), rhs),
        _ if lhs == rhs => Expr::Const(0.0),
        // a - (-1)*b = a + b
        (_, Expr::Mul(factor, inner)) if factor.as_const() == Some(-1.0) => {
            simplify_add(lhs.clone(), (**inner).clone())
        }
        _ => {
            let (c1, e1) = split_coefficient(&lhs);
            let (c2, e2) = split_coefficient(&rhs);
            if e1 == e2 {
                simplify_mul(Expr::Const(c1 - c2), e1)
            } else {
                Expr::Sub(lhs.boxed(), rhs.boxed())
            }
        }
    }
}

fn simplify_mul(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
        (Expr::Const(a), _) | (_, Expr::Const(a)) if *a == 0.0 => Expr::Const(0.0),
        (Expr::Const(a), _) if *a == 1.0 => rhs,
        (_, Expr::Const(b)) if *b == 1.0 => lhs,
        // constants go first
        (_, Expr::Const(_)) => simplify_mul(rhs, lhs),
        // c1 * (c2 * e) = (c1*c2) * e
        (Expr::Const(a), Expr::Mul(inner_lhs, inner_rhs)) => match inner_lhs.as_ref() {
            Expr::Const(b) => simplify_mul(Expr::Const(a * b), (**inner_rhs).clone()),
            _ => Expr::Mul(lhs.boxed(), rhs.boxed()),
        },
        // (c * e1) * e2 = c * (e1 * e2)
        (Expr::Mul(inner_lhs, inner_rhs), _) if inner_lhs.as_const().is_some() => {
            let product = simplify_mul((**inner_rhs).clone(), rhs.clone());
            simplify_mul((**inner_lhs).clone(), product)
        }
        // e1 * (c * e2) = c * (e1 * e2)
        (_, Expr::Mul(inner_lhs, inner_rhs)) if inner_lhs.as_const().is_some() => {
            let product = simplify_mul(lhs.clone(), (**inner_rhs).clone());
            simplify_mul((**inner_lhs).clone(), product)
        }
        (Expr::Const(_), _) => Expr::Mul(lhs.boxed(), rhs.boxed()),
        _ => {
            // x^a * x^b = x^(a+b), x * x = x^2
            let (base1, exp1) = as_power(&lhs);
            let (base2, exp2) = as_power(&rhs);
            if base1 == base2 && base1.as_const().is_none() {
                simplify_pow(base1, simplify_add(exp1, exp2))
            } else {
                Expr::Mul(lhs.boxed(), rhs.boxed())
            }
        }
    }
}

fn simplify_div(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
        (Expr::Const(a), _) if *a == 0.0 => Expr::Const(0.0),
        (_, Expr::Const(b)) if *b == 1.0 => lhs,
        // e / c = (1/c) * e
        (_, Expr::Const(b)) if *b != 0.0 => simplify_mul(Expr::Const(1.0 / b), lhs),
        _ if lhs == rhs => Expr::Const(1.0),
        // (c * e1) / e2 = c * (e1 / e2)
        (Expr::Mul(inner_lhs, inner_rhs), _) if inner_lhs.as_const().is_some() => {
            let quotient = simplify_div((**inner_rhs).clone(), rhs.clone());
            simplify_mul((**inner_lhs).clone(), quotient)
        }
        _ => {
            // x^a / x^b = x^(a-b)
            let (base1, exp1) = as_power(&lhs);
            let (base2, exp2) = as_power(&rhs);
            if base1 == base2 && base1.as_const().is_none() {
                simplify_pow(base1, simplify_sub(exp1, exp2))
            } else {
                Expr::Div(lhs.boxed(), rhs.boxed())
            }
        }
    }
}

fn simplify_pow(base: Expr, exp: Expr) -> Expr {
    match (&base, &exp) {
        (Expr::Const(a), Expr::Const(b)) => {
            fold_finite(a.powf(*b)).unwrap_or_else(|| Expr::Pow(base.boxed(), exp.boxed()))
        }
        (_, Expr::Const(b)) if *b == 0.0 => Expr::Const(1.0),
        (_, Expr::Const(b)) if *b == 1.0 => base,
        (Expr::Const(a), _) if *a == 1.0 => Expr::Const(1.0),
        _ => Expr::Pow(base.boxed(), exp.boxed()),
    }
}

impl Expr {
    /// One bottom-up simplification pass.
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => simplify_add(lhs.simplify_(), rhs.simplify_()),
            Expr::Sub(lhs, rhs) => simplify_sub(lhs.simplify_(), rhs.simplify_()),
            Expr::Mul(lhs, rhs) => simplify_mul(lhs.simplify_(), rhs.simplify_()),
            Expr::Div(lhs, rhs) => simplify_div(lhs.simplify_(), rhs.simplify_()),
            Expr::Pow(base, exp) => simplify_pow(base.simplify_(), exp.simplify_()),
            func => match func.function_argument() {
                Some(arg) => {
                    let arg = arg.simplify_();
                    match arg.as_const().and_then(|val| fold_function(func, val)) {
                        Some(folded) => folded,
                        None => func.with_function_argument(arg),
                    }
                }
                None => func.clone(),
            },
        }
    }

    /// Repeats simplification passes until the expression stops changing.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("0*x + 1*x^(2-1)", "x").unwrap();
    /// assert_eq!(expr.simplify(), Expr::var("x"));
    /// ```
    pub fn simplify(&self) -> Expr {
        let mut current = self.clone();
        for _ in 0..MAX_PASSES {
            let next = current.simplify_();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }
    fn c(val: f64) -> Expr {
        Expr::Const(val)
    }

    #[test]
    fn test_constant_folding() {
        let expr = (c(2.0) + c(3.0)) * c(4.0) - c(6.0) / c(3.0);
        assert_eq!(expr.simplify(), c(18.0));
        assert_eq!(Expr::cos(c(0.0).boxed()).simplify(), c(1.0));
    }

    #[test]
    fn test_division_by_zero_constant_is_kept() {
        let expr = c(1.0) / c(0.0);
        assert_eq!(expr.simplify(), c(1.0) / c(0.0));
        let expr = Expr::Ln(c(0.0).boxed());
        assert_eq!(expr.simplify(), Expr::Ln(c(0.0).boxed()));
    }

    #[test]
    fn test_identities() {
        assert_eq!((x() + c(0.0)).simplify(), x());
        assert_eq!((c(0.0) * Expr::sin(x().boxed())).simplify(), c(0.0));
        assert_eq!((x() * c(1.0)).simplify(), x());
        assert_eq!(x().pow(c(1.0)).simplify(), x());
        assert_eq!(x().pow(c(0.0)).simplify(), c(1.0));
        assert_eq!((x() - x()).simplify(), c(0.0));
        assert_eq!((x() / x()).simplify(), c(1.0));
    }

    #[test]
    fn test_power_rules() {
        assert_eq!((x() * x()).simplify(), x().pow(c(2.0)));
        assert_eq!((x().pow(c(2.0)) * x()).simplify(), x().pow(c(3.0)));
        assert_eq!((x().pow(c(5.0)) / x().pow(c(2.0))).simplify(), x().pow(c(3.0)));
        assert_eq!(x().pow(c(2.0) - c(1.0)).simplify(), x());
    }

    #[test]
    fn test_constant_collection() {
        assert_eq!(((c(2.0) * x()) * c(3.0)).simplify(), c(6.0) * x());
        assert_eq!((c(3.0) * (c(2.0) * x())).simplify(), c(6.0) * x());
        assert_eq!((x() * c(5.0)).simplify(), c(5.0) * x());
        assert_eq!(((c(4.0) * x()) / c(2.0)).simplify(), c(2.0) * x());
    }

    #[test]
    fn test_like_terms_and_signs() {
        assert_eq!((x() + x()).simplify(), c(2.0) * x());
        assert_eq!((c(3.0) * x() - x()).simplify(), c(2.0) * x());
        assert_eq!((c(0.0) - x()).simplify(), -x());
        assert_eq!((x() + -Expr::sin(x().boxed())).simplify(), x() - Expr::sin(x().boxed()));
        assert_eq!((-(-x())).simplify(), x());
    }

    #[test]
    fn test_simplify_reaches_fixed_point() {
        let expr = Expr::parse_expression("0*x + 1*x^(2-1) + (2*x)*0", "x").unwrap();
        let once = expr.simplify();
        assert_eq!(once, x());
        assert_eq!(once.simplify(), once);
    }
}
