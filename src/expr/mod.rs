mod eval;
mod lexer;
mod parser;

pub use eval::Bindings;

use std::f64::consts::PI;
use std::fmt;

use crate::error::{EvalError, ParseError};

/// Longest accepted expression source, in bytes.
pub const MAX_SOURCE_LEN: usize = 4096;

/// Deepest accepted nesting of parentheses and unary/power operators.
pub const MAX_NESTING: usize = 64;

/// A variable an expression may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    X,
    Y,
    T,
    Theta,
    /// Sequence index.
    N,
}

impl Variable {
    /// All variables, in binding-slot order.
    pub const ALL: [Self; 5] = [Self::X, Self::Y, Self::T, Self::Theta, Self::N];

    /// Name as written in expressions.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::T => "t",
            Self::Theta => "theta",
            Self::N => "n",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// An allow-listed unary function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Exp,
    /// Natural logarithm.
    Log,
    Sqrt,
}

impl Function {
    /// Name as written in expressions.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Sqrt => "sqrt",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        [
            Self::Sin,
            Self::Cos,
            Self::Tan,
            Self::Exp,
            Self::Log,
            Self::Sqrt,
        ]
        .into_iter()
        .find(|f| f.name() == name)
    }

    /// Applies the function, rejecting arguments outside its real domain.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Domain`] for `log` of a non-positive number or
    /// `sqrt` of a negative one, and [`EvalError::NonFinite`] on overflow.
    pub fn apply(self, argument: f64) -> Result<f64, EvalError> {
        let value = match self {
            Self::Sin => argument.sin(),
            Self::Cos => argument.cos(),
            Self::Tan => argument.tan(),
            Self::Exp => argument.exp(),
            Self::Log => {
                if argument <= 0.0 {
                    return Err(EvalError::Domain {
                        function: "log",
                        argument,
                    });
                }
                argument.ln()
            }
            Self::Sqrt => {
                if argument < 0.0 {
                    return Err(EvalError::Domain {
                        function: "sqrt",
                        argument,
                    });
                }
                argument.sqrt()
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite)
        }
    }
}

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
        }
    }
}

/// Parsed expression tree.
///
/// Only the allow-listed functions (`sin cos tan exp log sqrt`), the
/// constant `pi` and the variables passed to [`Expr::parse`] can appear.
/// Any other identifier is rejected at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal or the constant `pi`.
    Const(f64),
    Var(Variable),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: Function,
        arg: Box<Expr>,
    },
}

impl Expr {
    /// Parses `source`, accepting only the given variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the offending text for malformed
    /// syntax, or for any identifier outside the allow-list and `allowed`.
    pub fn parse(source: &str, allowed: &[Variable]) -> Result<Self, ParseError> {
        parser::Parser::parse(source, allowed)
    }

    /// Shorthand for the constant `pi`.
    #[must_use]
    pub fn pi() -> Self {
        Self::Const(PI)
    }

    /// Evaluates the tree under the given variable bindings.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] on division by zero, a domain error, a
    /// non-finite intermediate result, or an unbound variable.
    pub fn eval(&self, bindings: &Bindings) -> Result<f64, EvalError> {
        eval::evaluate(self, bindings)
    }

    /// Returns `true` if the expression references `var`.
    #[must_use]
    pub fn references(&self, var: Variable) -> bool {
        match self {
            Self::Const(_) => false,
            Self::Var(v) => *v == var,
            Self::Neg(inner) => inner.references(var),
            Self::Binary { left, right, .. } => left.references(var) || right.references(var),
            Self::Call { arg, .. } => arg.references(var),
        }
    }
}

impl fmt::Display for Expr {
    /// Fully parenthesized rendering, stable across re-parsing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(v) if v.to_bits() == PI.to_bits() => write!(f, "pi"),
            Self::Const(v) => write!(f, "{v}"),
            Self::Var(v) => write!(f, "{}", v.name()),
            Self::Neg(inner) => write!(f, "(-{inner})"),
            Self::Binary { op, left, right } => write!(f, "({left} {} {right})", op.symbol()),
            Self::Call { func, arg } => write!(f, "{}({arg})", func.name()),
        }
    }
}
