#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// error types of the symbolic layer
pub mod error;
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedExtrema::symbolic::symbolic_engine::Expr;
/// let input = "x^2*ln(x + 1) - exp(-x)/(x + 2)";
/// let parsed_expression = Expr::parse_expression(input, "x").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D("x").unwrap();
/// println!("{}, Rust function: {}  \n", input, parsed_function.eval(1.0));
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) differentiates and simplifies it
/// 3) turns a symbolic expression into a Rust function
/// 4) renders it as plain text or LaTeX
///# Example#
/// ```
/// use RustedExtrema::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x^3 - 3*x", "x").unwrap();
/// // first and second derivative
/// let df_dx = f.diff("x");
/// let d2f_dx2 = f.n_th_derivative1D("x", 2);
/// println!("df_dx = {}, d2f_dx2 = {}", df_dx, d2f_dx2);
/// println!("latex: {}", df_dx.to_latex());
/// // convert symbolic expression to a Rust function and evaluate the function
/// let df = df_dx.lambdify1D("x").unwrap();
/// assert_eq!(df.eval(1.0), 0.0);
/// // points where the derivative is undefined are reported as None
/// let g = Expr::parse_expression("ln(x)", "x").unwrap().lambdify1D("x").unwrap();
/// assert_eq!(g.try_eval(-1.0), None);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// LaTeX output
pub mod symbolic_latex;
/// compiling expressions into numeric evaluators
pub mod symbolic_lambdify;
pub mod symbolic_simplify;
/// rational form and closed-form zeros of denominators
pub mod symbolic_solve;
#[cfg(test)]
mod symbolic_engine_tests;
