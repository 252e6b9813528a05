use crate::error::ParseError;

use super::lexer::{Lexer, Spanned, Token};
use super::{BinaryOp, Expr, Function, Variable, MAX_NESTING, MAX_SOURCE_LEN};

/// Recursive-descent parser.
///
/// Precedence, loosest first:
///
/// ```text
/// additive := term (('+' | '-') term)*
/// term     := unary (('*' | '/') unary)*
/// unary    := ('+' | '-') unary | power
/// power    := primary (('**' | '^') unary)?
/// primary  := number | ident | ident '(' additive ')' | '(' additive ')'
/// ```
///
/// Power is right-associative and binds tighter than a leading sign, so
/// `-x**2` is `-(x**2)` and `2**-1` is `0.5`.
pub(super) struct Parser<'a> {
    tokens: Vec<Spanned>,
    pos: usize,
    allowed: &'a [Variable],
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn parse(source: &str, allowed: &'a [Variable]) -> Result<Expr, ParseError> {
        if source.len() > MAX_SOURCE_LEN {
            return Err(ParseError::TooLong {
                len: source.len(),
                max: MAX_SOURCE_LEN,
            });
        }
        if source.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let mut parser = Parser {
            tokens: Lexer::new(source).tokenize()?,
            pos: 0,
            allowed,
            depth: 0,
        };
        let expr = parser.parse_additive()?;
        let trailing = parser.current();
        match trailing.token {
            Token::End => Ok(expr),
            Token::RParen => Err(ParseError::UnbalancedParen {
                offset: trailing.offset,
            }),
            _ => Err(parser.unexpected()),
        }
    }

    fn current(&self) -> &Spanned {
        // The lexer always terminates the stream with `End`.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Spanned {
        let spanned = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        spanned
    }

    fn unexpected(&self) -> ParseError {
        let spanned = self.current();
        match spanned.token {
            Token::End => ParseError::UnexpectedEnd,
            _ => ParseError::UnexpectedToken {
                text: spanned.token.describe(),
                offset: spanned.offset,
            },
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current().token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep {
                offset: self.current().offset,
                max: MAX_NESTING,
            });
        }
        self.depth += 1;
        let result = match self.current().token {
            Token::Minus => {
                self.advance();
                self.parse_unary().map(|inner| Expr::Neg(Box::new(inner)))
            }
            Token::Plus => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        };
        self.depth -= 1;
        result
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_primary()?;
        if matches!(self.current().token, Token::StarStar | Token::Caret) {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let spanned = self.current().clone();
        match spanned.token {
            Token::Number(value) => {
                self.advance();
                Ok(Expr::Const(value))
            }
            Token::Ident(name) => {
                self.advance();
                self.parse_identifier(&name, spanned.offset)
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_additive()?;
                self.expect_close(spanned.offset)?;
                Ok(inner)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_identifier(&mut self, name: &str, offset: usize) -> Result<Expr, ParseError> {
        if self.current().token == Token::LParen {
            let Some(func) = Function::from_name(name) else {
                return Err(ParseError::UnknownFunction {
                    name: name.to_owned(),
                    offset,
                });
            };
            let open = self.advance().offset;
            let arg = self.parse_additive()?;
            self.expect_close(open)?;
            return Ok(Expr::Call {
                func,
                arg: Box::new(arg),
            });
        }

        if name == "pi" {
            return Ok(Expr::pi());
        }
        match Variable::from_name(name) {
            Some(var) if self.allowed.contains(&var) => Ok(Expr::Var(var)),
            _ => Err(ParseError::UnknownIdentifier {
                name: name.to_owned(),
                offset,
            }),
        }
    }

    fn expect_close(&mut self, open_offset: usize) -> Result<(), ParseError> {
        match self.current().token {
            Token::RParen => {
                self.advance();
                Ok(())
            }
            Token::End => Err(ParseError::UnbalancedParen {
                offset: open_offset,
            }),
            _ => Err(self.unexpected()),
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn parse_x(src: &str) -> Result<Expr, ParseError> {
        Expr::parse(src, &[Variable::X])
    }

    fn x() -> Expr {
        Expr::Var(Variable::X)
    }

    #[test]
    fn precedence_mul_over_add() {
        let expr = parse_x("1 + 2 * x").unwrap();
        assert_eq!(
            expr,
            binary(
                BinaryOp::Add,
                Expr::Const(1.0),
                binary(BinaryOp::Mul, Expr::Const(2.0), x())
            )
        );
    }

    #[test]
    fn power_is_right_associative() {
        let expr = parse_x("2 ** 3 ^ x").unwrap();
        assert_eq!(
            expr,
            binary(
                BinaryOp::Pow,
                Expr::Const(2.0),
                binary(BinaryOp::Pow, Expr::Const(3.0), x())
            )
        );
    }

    #[test]
    fn negation_binds_looser_than_power() {
        let expr = parse_x("-x**2").unwrap();
        assert_eq!(
            expr,
            Expr::Neg(Box::new(binary(BinaryOp::Pow, x(), Expr::Const(2.0))))
        );
    }

    #[test]
    fn negative_exponent() {
        let expr = parse_x("x**-1").unwrap();
        assert_eq!(
            expr,
            binary(BinaryOp::Pow, x(), Expr::Neg(Box::new(Expr::Const(1.0))))
        );
    }

    #[test]
    fn pi_and_functions() {
        let expr = parse_x("sqrt(pi)").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                func: Function::Sqrt,
                arg: Box::new(Expr::Const(PI)),
            }
        );
    }

    #[test]
    fn unbound_variable_rejected() {
        let err = parse_x("x + y").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownIdentifier {
                name: "y".into(),
                offset: 4,
            }
        );
    }

    #[test]
    fn arbitrary_names_rejected_before_evaluation() {
        let err = parse_x("__import__(x)").unwrap_err();
        assert!(matches!(err, ParseError::UnknownFunction { ref name, .. } if name == "__import__"));

        let err = parse_x("open").unwrap_err();
        assert!(matches!(err, ParseError::UnknownIdentifier { ref name, .. } if name == "open"));
    }

    #[test]
    fn bare_function_name_is_not_a_value() {
        let err = parse_x("sin + 1").unwrap_err();
        assert!(matches!(err, ParseError::UnknownIdentifier { ref name, .. } if name == "sin"));
    }

    #[test]
    fn unbalanced_parens() {
        assert_eq!(
            parse_x("(x + 1").unwrap_err(),
            ParseError::UnbalancedParen { offset: 0 }
        );
        assert_eq!(
            parse_x("x + 1)").unwrap_err(),
            ParseError::UnbalancedParen { offset: 5 }
        );
        assert_eq!(
            parse_x("sin(x").unwrap_err(),
            ParseError::UnbalancedParen { offset: 3 }
        );
    }

    #[test]
    fn dangling_operator() {
        assert_eq!(parse_x("x +").unwrap_err(), ParseError::UnexpectedEnd);
        assert_eq!(
            parse_x("x * * 2").unwrap_err(),
            ParseError::UnexpectedToken {
                text: "*".into(),
                offset: 4,
            }
        );
    }

    #[test]
    fn juxtaposition_is_rejected() {
        let err = parse_x("2 x").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                text: "x".into(),
                offset: 2,
            }
        );
    }

    #[test]
    fn empty_and_blank() {
        assert_eq!(parse_x("").unwrap_err(), ParseError::Empty);
        assert_eq!(parse_x("   ").unwrap_err(), ParseError::Empty);
    }

    #[test]
    fn nesting_limit() {
        let deep = format!("{}x{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        assert!(matches!(
            parse_x(&deep).unwrap_err(),
            ParseError::TooDeep { .. }
        ));
        let shallow = format!("{}x{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(parse_x(&shallow).unwrap(), x());
    }

    #[test]
    fn length_limit() {
        let long = "x+".repeat(MAX_SOURCE_LEN) + "x";
        assert!(matches!(
            parse_x(&long).unwrap_err(),
            ParseError::TooLong { .. }
        ));
    }
}
