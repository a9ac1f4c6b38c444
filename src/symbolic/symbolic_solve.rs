//! # Denominator zeros
//!
//! Points where a derivative is undefined because its denominator vanishes. The
//! expression is brought to a single fraction `num/den` (`together`), the denominator is
//! split into multiplicative factors and each `factor = 0` is solved in closed form:
//! - polynomials of degree <= 2 once powers of the variable are factored out
//! - `u^p = 0` with `p > 0` reduces to `u = 0`
//! - `g(u) = c` for the named functions through their inverses; `sin`, `cos`, `tg`, `ctg`
//!   give periodic families which are enumerated inside the domain window (the inner
//!   argument has to be linear in the variable)
//!
//! The solver is deliberately incomplete: as soon as one factor is outside these forms
//! the whole set is reported empty and the root finder stays the only source of critical
//! points.
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use std::f64::consts::{FRAC_PI_2, PI};

/// Highest polynomial degree expanded while collecting coefficients.
const MAX_POLY_DEGREE: usize = 16;
/// Upper bound on the members of one periodic family inside the window.
const MAX_FAMILY_SIZE: usize = 10_000;

impl Expr {
    /// Rational form `(numerator, denominator)` of the expression. Named functions and
    /// non-constant powers are kept whole in the numerator.
    pub fn together(&self) -> (Expr, Expr) {
        let one = || Expr::Const(1.0);
        match self {
            Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) => {
                let (n1, d1) = lhs.together();
                let (n2, d2) = rhs.together();
                let (n1, n2, den) = if d1 == d2 {
                    (n1, n2, d1)
                } else {
                    (n1 * d2.clone(), n2 * d1.clone(), d1 * d2)
                };
                let num = match self {
                    Expr::Add(..) => n1 + n2,
                    _ => n1 - n2,
                };
                (num.simplify(), den.simplify())
            }
            Expr::Mul(lhs, rhs) => {
                let (n1, d1) = lhs.together();
                let (n2, d2) = rhs.together();
                ((n1 * n2).simplify(), (d1 * d2).simplify())
            }
            Expr::Div(lhs, rhs) => {
                let (n1, d1) = lhs.together();
                let (n2, d2) = rhs.together();
                ((n1 * d2).simplify(), (d1 * n2).simplify())
            }
            Expr::Pow(base, exp) => match exp.as_const() {
                Some(p) => {
                    let (nb, db) = base.together();
                    if p >= 0.0 {
                        (nb.pow(Expr::Const(p)).simplify(), db.pow(Expr::Const(p)).simplify())
                    } else {
                        (db.pow(Expr::Const(-p)).simplify(), nb.pow(Expr::Const(-p)).simplify())
                    }
                }
                None => (self.clone(), one()),
            },
            _ => (self.clone(), one()),
        }
    }

    /// Real zeros of the denominator of `self` in `var`. Periodic families are restricted
    /// to `window`; the result is sorted and free of duplicates but may contain points
    /// outside the window for non-periodic factors.
    pub fn denominator_zeros(&self, var: &str, window: (f64, f64)) -> Vec<f64> {
        let (_, den) = self.simplify().together();
        let mut factors = Vec::new();
        collect_factors(&den, &mut factors);
        let mut zeros = Vec::new();
        for factor in factors.iter().filter(|f| f.contains_variable(var)) {
            match solve_equation(factor, 0.0, var, window) {
                Some(mut roots) => zeros.append(&mut roots),
                None => {
                    debug!("denominator factor {} is not solvable in closed form", factor);
                    return Vec::new();
                }
            }
        }
        zeros.retain(|z| z.is_finite());
        zeros.sort_by(f64::total_cmp);
        zeros.dedup();
        debug!("denominator {} vanishes at {:?}", den, zeros);
        zeros
    }
}

/// Multiplicative factors of a product; positive constant powers are reduced to their
/// base because they vanish exactly where the base does.
fn collect_factors(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Mul(lhs, rhs) => {
            collect_factors(lhs, out);
            collect_factors(rhs, out);
        }
        Expr::Pow(base, exp) if exp.as_const().is_some_and(|p| p > 0.0) => {
            collect_factors(base, out)
        }
        Expr::Const(_) => {}
        other => out.push(other.clone()),
    }
}

/// Coefficients `[c0, c1, ...]` of a polynomial in `var`, `None` for anything else.
fn polynomial_coefficients(expr: &Expr, var: &str) -> Option<Vec<f64>> {
    match expr {
        Expr::Const(c) => Some(vec![*c]),
        Expr::Var(name) if name == var => Some(vec![0.0, 1.0]),
        Expr::Add(lhs, rhs) => Some(poly_add(
            &polynomial_coefficients(lhs, var)?,
            &polynomial_coefficients(rhs, var)?,
            1.0,
        )),
        Expr::Sub(lhs, rhs) => Some(poly_add(
            &polynomial_coefficients(lhs, var)?,
            &polynomial_coefficients(rhs, var)?,
            -1.0,
        )),
        Expr::Mul(lhs, rhs) => {
            let product = poly_mul(
                &polynomial_coefficients(lhs, var)?,
                &polynomial_coefficients(rhs, var)?,
            );
            (product.len() <= MAX_POLY_DEGREE + 1).then_some(product)
        }
        Expr::Div(lhs, rhs) => {
            let divisor = rhs.as_const().filter(|c| *c != 0.0)?;
            let coeffs = polynomial_coefficients(lhs, var)?;
            Some(coeffs.iter().map(|c| c / divisor).collect())
        }
        Expr::Pow(base, exp) => {
            let p = exp.as_const()?;
            if p < 0.0 || p.fract() != 0.0 || p > MAX_POLY_DEGREE as f64 {
                return None;
            }
            let coeffs = polynomial_coefficients(base, var)?;
            let mut result = vec![1.0];
            for _ in 0..p as usize {
                result = poly_mul(&result, &coeffs);
                if result.len() > MAX_POLY_DEGREE + 1 {
                    return None;
                }
            }
            Some(result)
        }
        _ => None,
    }
}

fn poly_add(a: &[f64], b: &[f64], sign: f64) -> Vec<f64> {
    (0..a.len().max(b.len()))
        .map(|i| a.get(i).copied().unwrap_or(0.0) + sign * b.get(i).copied().unwrap_or(0.0))
        .collect()
}

fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, ai) in a.iter().enumerate() {
        for (j, bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// Real roots of a polynomial given by its coefficients; `None` when the degree left after
/// factoring out powers of the variable exceeds 2 or the polynomial vanishes identically.
fn polynomial_roots(coeffs: &[f64]) -> Option<Vec<f64>> {
    let mut coeffs = coeffs.to_vec();
    while coeffs.last().is_some_and(|c| *c == 0.0) {
        coeffs.pop();
    }
    if coeffs.is_empty() {
        return None;
    }
    let mut roots = Vec::new();
    let leading_zeros = coeffs.iter().take_while(|c| **c == 0.0).count();
    if leading_zeros > 0 {
        roots.push(0.0);
        coeffs.drain(..leading_zeros);
    }
    match coeffs.as_slice() {
        [_] => {}
        [c0, c1] => roots.push(-c0 / c1),
        [c0, c1, c2] => {
            let disc = c1 * c1 - 4.0 * c2 * c0;
            if disc == 0.0 {
                roots.push(-c1 / (2.0 * c2));
            } else if disc > 0.0 {
                let sq = disc.sqrt();
                roots.push((-c1 - sq) / (2.0 * c2));
                roots.push((-c1 + sq) / (2.0 * c2));
            }
        }
        _ => return None,
    }
    Some(roots)
}

/// `(a, b)` with `u = a*var + b`, `a != 0`.
fn linear_coefficients(u: &Expr, var: &str) -> Option<(f64, f64)> {
    match polynomial_coefficients(u, var)?.as_slice() {
        [b, a] if *a != 0.0 => Some((*a, *b)),
        [b, a, rest @ ..] if *a != 0.0 && rest.iter().all(|c| *c == 0.0) => Some((*a, *b)),
        _ => None,
    }
}

/// Solutions of `u = t0 + k*period` for all integers k with `var` inside `window`.
fn periodic_family(
    u: &Expr,
    var: &str,
    window: (f64, f64),
    families: &[(f64, f64)],
) -> Option<Vec<f64>> {
    let (a, b) = linear_coefficients(u, var)?;
    let (t_lo, t_hi) = {
        let t1 = a * window.0 + b;
        let t2 = a * window.1 + b;
        (t1.min(t2), t1.max(t2))
    };
    let mut roots = Vec::new();
    for &(t0, period) in families {
        let k_lo = ((t_lo - t0) / period).ceil();
        let k_hi = ((t_hi - t0) / period).floor();
        if !(k_lo.is_finite() && k_hi.is_finite()) || k_hi - k_lo > MAX_FAMILY_SIZE as f64 {
            return None;
        }
        let mut k = k_lo;
        while k <= k_hi {
            roots.push((t0 + k * period - b) / a);
            k += 1.0;
        }
    }
    Some(roots)
}

/// Solves `lhs = rhs` for `var`; `None` when the form is not supported.
fn solve_equation(lhs: &Expr, rhs: f64, var: &str, window: (f64, f64)) -> Option<Vec<f64>> {
    if !lhs.contains_variable(var) {
        return Some(Vec::new());
    }
    if let Some(mut coeffs) = polynomial_coefficients(lhs, var) {
        coeffs[0] -= rhs;
        return polynomial_roots(&coeffs);
    }
    match lhs {
        Expr::Add(a, b) => match (a.as_const(), b.as_const()) {
            (Some(c), _) => solve_equation(b, rhs - c, var, window),
            (_, Some(c)) => solve_equation(a, rhs - c, var, window),
            _ => None,
        },
        Expr::Sub(a, b) => match (a.as_const(), b.as_const()) {
            (Some(c), _) => solve_equation(b, c - rhs, var, window),
            (_, Some(c)) => solve_equation(a, rhs + c, var, window),
            _ => None,
        },
        Expr::Mul(a, b) => match a.as_const() {
            Some(k) if k != 0.0 => solve_equation(b, rhs / k, var, window),
            _ => None,
        },
        Expr::Div(a, b) => match b.as_const() {
            Some(k) if k != 0.0 => solve_equation(a, rhs * k, var, window),
            _ => None,
        },
        Expr::Pow(base, exp) => match exp.as_const() {
            Some(p) if p > 0.0 && rhs == 0.0 => solve_equation(base, 0.0, var, window),
            _ => None,
        },
        Expr::Exp(u) => {
            if rhs > 0.0 {
                solve_equation(u, rhs.ln(), var, window)
            } else {
                Some(Vec::new())
            }
        }
        Expr::Ln(u) => solve_equation(u, rhs.exp(), var, window),
        Expr::arctg(u) if rhs.abs() < FRAC_PI_2 => solve_equation(u, rhs.tan(), var, window),
        Expr::arcctg(u) if rhs > 0.0 && rhs < PI => {
            solve_equation(u, (FRAC_PI_2 - rhs).tan(), var, window)
        }
        Expr::arcsin(u) if rhs.abs() <= FRAC_PI_2 => solve_equation(u, rhs.sin(), var, window),
        Expr::arccos(u) if (0.0..=PI).contains(&rhs) => {
            solve_equation(u, rhs.cos(), var, window)
        }
        Expr::arctg(_) | Expr::arcctg(_) | Expr::arcsin(_) | Expr::arccos(_) => Some(Vec::new()),
        Expr::sin(u) => {
            if rhs.abs() > 1.0 {
                return Some(Vec::new());
            }
            let t0 = rhs.asin();
            periodic_family(u, var, window, &[(t0, 2.0 * PI), (PI - t0, 2.0 * PI)])
        }
        Expr::cos(u) => {
            if rhs.abs() > 1.0 {
                return Some(Vec::new());
            }
            let t0 = rhs.acos();
            periodic_family(u, var, window, &[(t0, 2.0 * PI), (-t0, 2.0 * PI)])
        }
        Expr::tg(u) => periodic_family(u, var, window, &[(rhs.atan(), PI)]),
        Expr::ctg(u) => periodic_family(u, var, window, &[(FRAC_PI_2 - rhs.atan(), PI)]),
        _ => None,
    }
}
