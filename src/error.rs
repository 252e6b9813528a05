use thiserror::Error;

/// Top-level error type for the curvelab engine.
#[derive(Debug, Error)]
pub enum CurvelabError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Evaluation(#[from] EvalError),
}

/// Errors raised while parsing an expression.
///
/// Every variant carries the byte offset into the source text so the host
/// can point at the offending input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unexpected '{text}' at offset {offset}")]
    UnexpectedToken { text: String, offset: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unknown identifier '{name}' at offset {offset}")]
    UnknownIdentifier { name: String, offset: usize },

    #[error("unknown function '{name}' at offset {offset}")]
    UnknownFunction { name: String, offset: usize },

    #[error("unbalanced parenthesis at offset {offset}")]
    UnbalancedParen { offset: usize },

    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("empty expression")]
    Empty,

    #[error("expression is {len} bytes long, the limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("expression nests deeper than {max} levels at offset {offset}")]
    TooDeep { offset: usize, max: usize },
}

/// Errors raised while evaluating an expression at a single point.
///
/// Samplers never propagate these; they turn them into undefined samples.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("{function} is undefined at {argument}")]
    Domain {
        function: &'static str,
        argument: f64,
    },

    #[error("result is not finite")]
    NonFinite,

    #[error("variable '{0}' is not bound")]
    Unbound(&'static str),
}

/// Errors raised while validating host-supplied parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("invalid range [{min}, {max}]: min must be less than max and both finite")]
    InvalidRange { min: f64, max: f64 },

    #[error("malformed range '{0}': expected \"min,max\"")]
    MalformedRange(String),

    #[error("malformed number '{0}'")]
    MalformedNumber(String),

    #[error("resolution {value} is out of range [{min}, {max}]")]
    ResolutionOutOfRange {
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("depth {value} exceeds the maximum of {max}")]
    DepthOutOfRange { value: u32, max: u32 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("malformed parametric equation '{0}': expected \"x(t), y(t), t_min, t_max\"")]
    MalformedParametric(String),

    #[error("dataset is empty")]
    EmptyDataset,
}

/// Convenience type alias for results using [`CurvelabError`].
pub type Result<T> = std::result::Result<T, CurvelabError>;
