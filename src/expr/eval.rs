use crate::error::EvalError;

use super::{BinaryOp, Expr, Variable};

/// Values for the variables of one evaluation point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bindings {
    slots: [Option<f64>; Variable::ALL.len()],
}

impl Bindings {
    /// Creates an empty set of bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `var` bound to `value`.
    #[must_use]
    pub fn with(mut self, var: Variable, value: f64) -> Self {
        self.set(var, value);
        self
    }

    /// Binds `var` to `value` in place.
    pub fn set(&mut self, var: Variable, value: f64) {
        self.slots[var.slot()] = Some(value);
    }

    /// Returns the value bound to `var`, if any.
    #[must_use]
    pub fn get(&self, var: Variable) -> Option<f64> {
        self.slots[var.slot()]
    }
}

pub(super) fn evaluate(expr: &Expr, bindings: &Bindings) -> Result<f64, EvalError> {
    match expr {
        Expr::Const(value) => Ok(*value),
        Expr::Var(var) => bindings.get(*var).ok_or(EvalError::Unbound(var.name())),
        Expr::Neg(inner) => evaluate(inner, bindings).map(|v| -v),
        Expr::Call { func, arg } => func.apply(evaluate(arg, bindings)?),
        Expr::Binary { op, left, right } => {
            let l = evaluate(left, bindings)?;
            let r = evaluate(right, bindings)?;
            apply_binary(*op, l, r)
        }
    }
}

fn apply_binary(op: BinaryOp, l: f64, r: f64) -> Result<f64, EvalError> {
    let value = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => {
            if r == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            l / r
        }
        BinaryOp::Pow => {
            let value = l.powf(r);
            // Negative base with a fractional exponent has no real value.
            if value.is_nan() {
                return Err(EvalError::Domain {
                    function: "pow",
                    argument: l,
                });
            }
            value
        }
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}
