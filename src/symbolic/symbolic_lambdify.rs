//! LAMBDIFICATION - turning symbolic expressions into numeric evaluators.
//!
//! An [`Expr`] is compiled once into a [`Lambda`] tree whose leaves no longer carry
//! variable names, then evaluated as often as needed. Evaluation follows IEEE-754: a
//! point outside the domain of the function (pole, log of a negative number, fractional
//! power of a negative base) yields NaN or an infinity, `try_eval` reports such points as
//! `None`.
use crate::symbolic::error::SymbolicError;
use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::FRAC_PI_2;

#[derive(Clone, Debug, PartialEq)]
pub enum Lambda {
    Arg,
    Const(f64),
    Add(Box<Lambda>, Box<Lambda>),
    Sub(Box<Lambda>, Box<Lambda>),
    Mul(Box<Lambda>, Box<Lambda>),
    Div(Box<Lambda>, Box<Lambda>),
    Pow(Box<Lambda>, Box<Lambda>),
    Exp(Box<Lambda>),
    Ln(Box<Lambda>),
    Sin(Box<Lambda>),
    Cos(Box<Lambda>),
    Tg(Box<Lambda>),
    Ctg(Box<Lambda>),
    ArcSin(Box<Lambda>),
    ArcCos(Box<Lambda>),
    ArcTg(Box<Lambda>),
    ArcCtg(Box<Lambda>),
}

impl Expr {
    /// Compiles the expression for evaluation in the single variable `var`. Any other
    /// variable name is reported as unbound.
    pub fn compile(&self, var: &str) -> Result<Lambda, SymbolicError> {
        let bin = |a: &Expr, b: &Expr| -> Result<(Box<Lambda>, Box<Lambda>), SymbolicError> {
            Ok((Box::new(a.compile(var)?), Box::new(b.compile(var)?)))
        };
        let lambda = match self {
            Expr::Var(name) => {
                if name != var {
                    return Err(SymbolicError::UnboundVariable {
                        name: name.clone(),
                        expected: var.to_string(),
                    });
                }
                Lambda::Arg
            }
            Expr::Const(v) => Lambda::Const(*v),
            Expr::Add(a, b) => {
                let (a, b) = bin(a, b)?;
                Lambda::Add(a, b)
            }
            Expr::Sub(a, b) => {
                let (a, b) = bin(a, b)?;
                Lambda::Sub(a, b)
            }
            Expr::Mul(a, b) => {
                let (a, b) = bin(a, b)?;
                Lambda::Mul(a, b)
            }
            Expr::Div(a, b) => {
                let (a, b) = bin(a, b)?;
                Lambda::Div(a, b)
            }
            Expr::Pow(a, b) => {
                let (a, b) = bin(a, b)?;
                Lambda::Pow(a, b)
            }
            Expr::Exp(e) => Lambda::Exp(Box::new(e.compile(var)?)),
            Expr::Ln(e) => Lambda::Ln(Box::new(e.compile(var)?)),
            Expr::sin(e) => Lambda::Sin(Box::new(e.compile(var)?)),
            Expr::cos(e) => Lambda::Cos(Box::new(e.compile(var)?)),
            Expr::tg(e) => Lambda::Tg(Box::new(e.compile(var)?)),
            Expr::ctg(e) => Lambda::Ctg(Box::new(e.compile(var)?)),
            Expr::arcsin(e) => Lambda::ArcSin(Box::new(e.compile(var)?)),
            Expr::arccos(e) => Lambda::ArcCos(Box::new(e.compile(var)?)),
            Expr::arctg(e) => Lambda::ArcTg(Box::new(e.compile(var)?)),
            Expr::arcctg(e) => Lambda::ArcCtg(Box::new(e.compile(var)?)),
        };
        Ok(lambda)
    }

    /// Converts a single-variable symbolic expression into a [`NumericEvaluator`].
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::var("x").pow(Expr::Const(2.0));
    /// let func = f.lambdify1D("x").unwrap();
    /// assert_eq!(func.eval(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self, var: &str) -> Result<NumericEvaluator, SymbolicError> {
        Ok(NumericEvaluator {
            lambda: self.compile(var)?,
        })
    }
}

impl Lambda {
    #[inline(always)]
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Lambda::Arg => x,
            Lambda::Const(v) => *v,
            Lambda::Add(a, b) => a.eval(x) + b.eval(x),
            Lambda::Sub(a, b) => a.eval(x) - b.eval(x),
            Lambda::Mul(a, b) => a.eval(x) * b.eval(x),
            Lambda::Div(a, b) => a.eval(x) / b.eval(x),
            Lambda::Pow(a, b) => a.eval(x).powf(b.eval(x)),
            Lambda::Exp(e) => e.eval(x).exp(),
            Lambda::Ln(e) => e.eval(x).ln(),
            Lambda::Sin(e) => e.eval(x).sin(),
            Lambda::Cos(e) => e.eval(x).cos(),
            Lambda::Tg(e) => e.eval(x).tan(),
            Lambda::Ctg(e) => 1.0 / e.eval(x).tan(),
            Lambda::ArcSin(e) => e.eval(x).asin(),
            Lambda::ArcCos(e) => e.eval(x).acos(),
            Lambda::ArcTg(e) => e.eval(x).atan(),
            Lambda::ArcCtg(e) => FRAC_PI_2 - e.eval(x).atan(),
        }
    }
}

/// Compiled real function of one real variable. Cheap to clone and safe to share
/// between threads.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericEvaluator {
    lambda: Lambda,
}

impl NumericEvaluator {
    /// Raw IEEE-754 value, NaN or infinite outside the domain.
    pub fn eval(&self, x: f64) -> f64 {
        self.lambda.eval(x)
    }

    /// Value at `x`, `None` where the function is undefined (non-finite result).
    pub fn try_eval(&self, x: f64) -> Option<f64> {
        let val = self.lambda.eval(x);
        if val.is_finite() { Some(val) } else { None }
    }

    /// Evaluates every point; undefined points come back as NaN.
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter()
            .map(|&x| self.try_eval(x).unwrap_or(f64::NAN))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lambdify_polynomial() {
        let f = Expr::parse_expression("3*x^2 - 2*x + 1", "x").unwrap();
        let func = f.lambdify1D("x").unwrap();
        assert_relative_eq!(func.eval(2.0), 9.0);
        assert_relative_eq!(func.eval(-1.0), 6.0);
    }

    #[test]
    fn test_lambdify_functions() {
        let f = Expr::parse_expression("sin(x) + cos(x) + exp(x) + ln(x)", "x").unwrap();
        let func = f.lambdify1D("x").unwrap();
        let x0: f64 = 0.7;
        assert_relative_eq!(
            func.eval(x0),
            x0.sin() + x0.cos() + x0.exp() + x0.ln(),
            epsilon = 1e-14
        );
        let g = Expr::parse_expression("cot(x) + arcctg(x)", "x").unwrap();
        let gfunc = g.lambdify1D("x").unwrap();
        assert_relative_eq!(
            gfunc.eval(x0),
            1.0 / x0.tan() + FRAC_PI_2 - x0.atan(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_undefined_points() {
        let f = Expr::parse_expression("1/x", "x").unwrap().lambdify1D("x").unwrap();
        assert!(f.eval(0.0).is_infinite());
        assert_eq!(f.try_eval(0.0), None);
        assert_eq!(f.try_eval(2.0), Some(0.5));

        let g = Expr::parse_expression("ln(x)", "x").unwrap().lambdify1D("x").unwrap();
        assert_eq!(g.try_eval(-1.0), None);
        let values = g.eval_many(&[-1.0, 1.0]);
        assert!(values[0].is_nan());
        assert_eq!(values[1], 0.0);
    }

    #[test]
    fn test_unbound_variable() {
        let f = Expr::var("y") + Expr::var("x");
        assert_eq!(
            f.lambdify1D("x"),
            Err(SymbolicError::UnboundVariable {
                name: "y".to_string(),
                expected: "x".to_string()
            })
        );
    }

    #[test]
    fn test_constant_expression() {
        let f = Expr::Const(4.5).lambdify1D("x").unwrap();
        assert_eq!(f.eval_many(&[0.0, 100.0]), vec![4.5, 4.5]);
    }
}
