//! Scalar root finding: Newton-Raphson with an analytical or numerical derivative and a
//! fixed-budget bisection used as its fallback.
//!
//! Both methods treat a non-finite function value as "undefined" and give up with
//! [`RootFindingError::FunctionUndefined`] instead of propagating NaN.
use log::trace;
use thiserror::Error;

/// Enum to represent the root finding methods
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootFindingMethod {
    Bisection,
    NewtonRaphson,
}

/// Error types for root finding methods
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RootFindingError {
    #[error("maximum iterations reached")]
    MaxIterationsReached,
    #[error("function values at the ends of [{0}, {1}] do not change sign")]
    InvalidInterval(f64, f64),
    #[error("function is undefined at x = {0}")]
    FunctionUndefined(f64),
    #[error("derivative is zero at x = {0}")]
    DerivativeZero(f64),
}
//////////////////////////////////TRAITS AND IMPLEMENTATIONS/////////////////////////////////

/// Scalar equation f(x) = 0 as seen by the solvers
pub trait NonlinearFunction {
    /// raw value, non-finite where f is undefined
    fn evaluate(&self, x: f64) -> f64;

    /// `None` makes Newton-Raphson use a central difference
    fn derivative(&self, _x: f64) -> Option<f64> {
        None
    }

    /// shown in trace logs
    fn name(&self) -> &str {
        "f"
    }
}

/// Function wrapper with analytical derivative. A derivative that is undefined at some
/// point is reported as `None` there so that the solver can fall back to differences.
pub struct FunctionWithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    func: F,
    derivative_func: D,
    name: String,
}

impl<F, D> FunctionWithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    pub fn new(func: F, derivative_func: D, name: String) -> Self {
        Self {
            func,
            derivative_func,
            name,
        }
    }
}

impl<F, D> NonlinearFunction for FunctionWithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        let d = (self.derivative_func)(x);
        d.is_finite().then_some(d)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

///////////////////////////////////////////SETTERS AND GETTERS///////////////////////////////////////////
/// Result structure for root finding methods
#[derive(Debug, Clone, PartialEq)]
pub struct RootFindingResult {
    pub root: f64,
    pub function_value: f64,
    pub iterations: usize,
    pub converged: bool,
    pub method: RootFindingMethod,
}

/// Configuration for root finding methods
#[derive(Debug, Clone)]
pub struct RootFindingConfig {
    /// Newton stops once |dx| < tolerance * max(1, |x|)
    pub tolerance: f64,
    pub max_iterations: usize,
    /// number of halvings done by bisection, it always spends all of them
    pub bisection_iterations: usize,
    /// step of the central difference used when no analytical derivative is available
    pub numeric_step: f64,
}

impl Default for RootFindingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 100,
            bisection_iterations: 40,
            numeric_step: 1e-8,
        }
    }
}

/// Main structure for scalar root finding methods
#[derive(Debug, Clone, Default)]
pub struct ScalarRootFinder {
    config: RootFindingConfig,
}

impl ScalarRootFinder {
    /// Create a new ScalarRootFinder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /////////////////////////////////////////METHODS///////////////////////////////////////////

    /// Bisection method for finding roots.
    /// Requires that f(a) and f(b) have opposite signs (or one of them is an exact zero);
    /// returns the midpoint of the final bracket.
    pub fn bisection<F>(
        &self,
        function: &F,
        mut a: f64,
        mut b: f64,
    ) -> Result<RootFindingResult, RootFindingError>
    where
        F: NonlinearFunction,
    {
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        let mut fa = defined(function, a)?;
        let fb = defined(function, b)?;
        let exact_root = |root: f64, function_value: f64, iterations: usize| RootFindingResult {
            root,
            function_value,
            iterations,
            converged: true,
            method: RootFindingMethod::Bisection,
        };
        if fa == 0.0 {
            return Ok(exact_root(a, fa, 0));
        }
        if fb == 0.0 {
            return Ok(exact_root(b, fb, 0));
        }
        if fa * fb > 0.0 {
            return Err(RootFindingError::InvalidInterval(a, b));
        }
        trace!(
            "bisection for {} on [{}, {}]",
            function.name(),
            a,
            b
        );

        for iteration in 0..self.config.bisection_iterations {
            let c = 0.5 * (a + b);
            let fc = defined(function, c)?;
            if fc == 0.0 {
                return Ok(exact_root(c, fc, iteration + 1));
            }
            if fa * fc < 0.0 {
                b = c;
            } else {
                a = c;
                fa = fc;
            }
        }
        let root = 0.5 * (a + b);
        Ok(RootFindingResult {
            root,
            function_value: function.evaluate(root),
            iterations: self.config.bisection_iterations,
            converged: true,
            method: RootFindingMethod::Bisection,
        })
    }

    pub fn newton_raphson<F>(
        &self,
        function: &F,
        mut x: f64,
    ) -> Result<RootFindingResult, RootFindingError>
    where
        F: NonlinearFunction,
    {
        trace!("Newton-Raphson for {} from x0 = {}", function.name(), x);
        for iteration in 0..self.config.max_iterations {
            let fx = defined(function, x)?;
            if fx == 0.0 {
                return Ok(RootFindingResult {
                    root: x,
                    function_value: fx,
                    iterations: iteration,
                    converged: true,
                    method: RootFindingMethod::NewtonRaphson,
                });
            }

            let fpx = match function.derivative(x) {
                Some(deriv) => deriv,
                // numerical differentiation if analytical derivative is not available
                None => {
                    let h = self.config.numeric_step * x.abs().max(1.0);
                    (function.evaluate(x + h) - function.evaluate(x - h)) / (2.0 * h)
                }
            };
            if !fpx.is_finite() {
                return Err(RootFindingError::FunctionUndefined(x));
            }
            if fpx == 0.0 {
                return Err(RootFindingError::DerivativeZero(x));
            }

            let x_new = x - fx / fpx;
            if !x_new.is_finite() {
                return Err(RootFindingError::FunctionUndefined(x));
            }
            if (x_new - x).abs() < self.config.tolerance * x.abs().max(1.0) {
                return Ok(RootFindingResult {
                    root: x_new,
                    function_value: function.evaluate(x_new),
                    iterations: iteration + 1,
                    converged: true,
                    method: RootFindingMethod::NewtonRaphson,
                });
            }
            x = x_new;
        }
        Err(RootFindingError::MaxIterationsReached)
    }

    /// Newton-Raphson from the middle of `bracket`, accepted only when it lands inside
    /// `window`; otherwise bisection on `bracket`.
    pub fn solve<F>(
        &self,
        function: &F,
        bracket: (f64, f64),
        window: (f64, f64),
    ) -> Result<RootFindingResult, RootFindingError>
    where
        F: NonlinearFunction,
    {
        let (a, b) = bracket;
        match self.newton_raphson(function, 0.5 * (a + b)) {
            Ok(result) if result.root >= window.0 && result.root <= window.1 => Ok(result),
            Ok(result) => {
                trace!(
                    "{}: Newton-Raphson left [{}, {}] at {}, bisecting",
                    function.name(),
                    window.0,
                    window.1,
                    result.root
                );
                self.bisection(function, a, b)
            }
            Err(err) => {
                trace!("{}: Newton-Raphson failed ({}), bisecting", function.name(), err);
                self.bisection(function, a, b)
            }
        }
    }
}

fn defined<F: NonlinearFunction>(function: &F, x: f64) -> Result<f64, RootFindingError> {
    let fx = function.evaluate(x);
    if fx.is_finite() {
        Ok(fx)
    } else {
        Err(RootFindingError::FunctionUndefined(x))
    }
}
