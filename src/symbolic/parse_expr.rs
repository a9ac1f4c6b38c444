//! Turns a String expression into a symbolic expression
//!
//! # Example
//! ```
//! use RustedExtrema::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("x^3 - 3*x + sin(2*x)", "x").unwrap();
//! println!(" parsed_expression {}", parsed_expression);
//! assert!(Expr::parse_expression("x +* 2", "x").is_err());
//! ```
//!
//! Grammar, lowest precedence first (`^` and `**` are right associative):
//! ```text
//! expr  = term (('+' | '-') term)*
//! term  = unary (('*' | '/') unary)*
//! unary = ('-' | '+') unary | power
//! power = atom (('^' | '**') unary)?
//! atom  = number | function '(' expr ')' | identifier | '(' expr ')'
//! ```
use crate::symbolic::error::ParseError;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, cut, map, map_res, not, opt, recognize},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use std::f64::consts::{E, PI};

type PResult<'a, T> = IResult<&'a str, T>;

/// Skips whitespace around the inner parser
fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// Unsigned decimal number with optional fraction and exponent: 2, 2.5, .5, 1e-6
fn number(input: &str) -> PResult<'_, f64> {
    map_res(
        recognize((
            alt((
                recognize((digit1, opt((char('.'), digit0)))),
                recognize((char('.'), digit1)),
            )),
            opt((one_of("eE"), opt(one_of("+-")), digit1)),
        )),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

/// Word characters starting with a letter or underscore, same rule as task file keys
fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Maps a function name onto its tree node; `None` for unknown names.
fn apply_function(name: &str, arg: Expr) -> Option<Expr> {
    let arg = Box::new(arg);
    let expr = match name {
        "exp" => Expr::Exp(arg),
        "ln" | "log" => Expr::Ln(arg),
        "sqrt" => Expr::Pow(arg, Box::new(Expr::Const(0.5))),
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tan" | "tg" => Expr::tg(arg),
        "cot" | "ctg" => Expr::ctg(arg),
        "asin" | "arcsin" => Expr::arcsin(arg),
        "acos" | "arccos" => Expr::arccos(arg),
        "atan" | "arctan" | "arctg" => Expr::arctg(arg),
        "acot" | "arccot" | "arcctg" => Expr::arcctg(arg),
        _ => return None,
    };
    Some(expr)
}

fn parenthesized(input: &str) -> PResult<'_, Expr> {
    delimited(ws(char('(')), expression, cut(ws(char(')')))).parse(input)
}

fn function_call(input: &str) -> PResult<'_, Expr> {
    let (rest, name) = identifier(input)?;
    let (rest, arg) = parenthesized(rest)?;
    match apply_function(name, arg) {
        Some(expr) => Ok((rest, expr)),
        // the name is followed by an argument list, so it can only be a misspelled function
        None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
    }
}

fn symbol(input: &str) -> PResult<'_, Expr> {
    map(identifier, |name: &str| match name {
        "pi" => Expr::Const(PI),
        "e" => Expr::Const(E),
        _ => Expr::Var(name.to_string()),
    })
    .parse(input)
}

fn atom(input: &str) -> PResult<'_, Expr> {
    ws(alt((
        map(number, Expr::Const),
        function_call,
        symbol,
        parenthesized,
    )))
    .parse(input)
}

fn power(input: &str) -> PResult<'_, Expr> {
    let (rest, base) = atom(input)?;
    let (rest, exponent) =
        opt(preceded(ws(alt((tag("**"), tag("^")))), cut(unary))).parse(rest)?;
    let expr = match exponent {
        Some(exponent) => Expr::Pow(Box::new(base), Box::new(exponent)),
        None => base,
    };
    Ok((rest, expr))
}

fn unary(input: &str) -> PResult<'_, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |expr: Expr| -expr),
        preceded(ws(char('+')), unary),
        power,
    ))
    .parse(input)
}

fn term(input: &str) -> PResult<'_, Expr> {
    let (rest, first) = unary(input)?;
    let product_op = alt((terminated(char('*'), not(char('*'))), char('/')));
    let (rest, tail) = many0(pair(ws(product_op), unary)).parse(rest)?;
    let expr = tail.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => Expr::Mul(Box::new(acc), Box::new(rhs)),
        _ => Expr::Div(Box::new(acc), Box::new(rhs)),
    });
    Ok((rest, expr))
}

fn expression(input: &str) -> PResult<'_, Expr> {
    let (rest, first) = term(input)?;
    let (rest, tail) = many0(pair(ws(one_of("+-")), term)).parse(rest)?;
    let expr = tail.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => Expr::Add(Box::new(acc), Box::new(rhs)),
        _ => Expr::Sub(Box::new(acc), Box::new(rhs)),
    });
    Ok((rest, expr))
}

fn to_parse_error(input: &str, err: Error<&str>) -> ParseError {
    let position = input.len() - err.input.len();
    if err.code == ErrorKind::Verify {
        let name = identifier(err.input)
            .map(|(_, name)| name.to_string())
            .unwrap_or_default();
        return ParseError::UnknownFunction { name, position };
    }
    let fragment = err.input.trim();
    let fragment = if fragment.is_empty() {
        "<end of input>".to_string()
    } else {
        fragment.chars().take(24).collect()
    };
    ParseError::Unexpected { position, fragment }
}

/// Parses `input` into a tree whose only free variable is `variable`.
pub fn parse_expression_func(input: &str, variable: &str) -> Result<Expr, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let expr = match all_consuming(ws(expression)).parse(input) {
        Ok((_, expr)) => expr,
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
            return Err(to_parse_error(input, err));
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(ParseError::Unexpected {
                position: input.len(),
                fragment: "<end of input>".to_string(),
            });
        }
    };
    if let Some(name) = expr
        .all_arguments_are_variables()
        .into_iter()
        .find(|name| name != variable)
    {
        return Err(ParseError::UnknownSymbol {
            name,
            variable: variable.to_string(),
        });
    }
    Ok(expr)
}

impl Expr {
    /// Parses an expression string in one variable.
    ///
    /// # Supported Syntax
    /// - Variable: the name passed as `variable`
    /// - Constants: 3.14, 2, .5, 1e-6, pi, e
    /// - Operators: +, -, *, /, ^ (or **), unary minus
    /// - Functions: exp, ln/log, sqrt, sin, cos, tan/tg, cot/ctg, asin, acos, atan, acot
    /// - Parentheses for grouping
    pub fn parse_expression(input: &str, variable: &str) -> Result<Expr, ParseError> {
        let parsed = parse_expression_func(input, variable);
        match &parsed {
            Ok(expr) => debug!("parsed '{}' into {}", input, expr),
            Err(err) => debug!("failed to parse '{}': {}", input, err),
        }
        parsed
    }
}
