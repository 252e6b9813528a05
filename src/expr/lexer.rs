use crate::error::ParseError;

/// Lexical token of the expression grammar.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Caret,
    Slash,
    LParen,
    RParen,
    Comma,
    End,
}

impl Token {
    /// Source-like rendering used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Number(v) => v.to_string(),
            Self::Ident(name) => name.clone(),
            Self::Plus => "+".to_owned(),
            Self::Minus => "-".to_owned(),
            Self::Star => "*".to_owned(),
            Self::StarStar => "**".to_owned(),
            Self::Caret => "^".to_owned(),
            Self::Slash => "/".to_owned(),
            Self::LParen => "(".to_owned(),
            Self::RParen => ")".to_owned(),
            Self::Comma => ",".to_owned(),
            Self::End => "end of input".to_owned(),
        }
    }
}

/// A token together with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Splits expression source into tokens.
///
/// Any character outside the grammar is an error.
pub(crate) struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Tokenizes the whole source. The last token is always [`Token::End`].
    pub(crate) fn tokenize(mut self) -> Result<Vec<Spanned>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::End;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(ahead)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Spanned, ParseError> {
        self.skip_whitespace();
        let offset = self.pos;
        let Some(c) = self.peek() else {
            return Ok(Spanned {
                token: Token::End,
                offset,
            });
        };

        let token = match c {
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '/' => self.single(Token::Slash),
            '^' => self.single(Token::Caret),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            ',' => self.single(Token::Comma),
            '*' => {
                self.bump();
                if self.peek() == Some('*') {
                    self.bump();
                    Token::StarStar
                } else {
                    Token::Star
                }
            }
            _ if c.is_ascii_digit() || c == '.' => self.read_number(offset)?,
            _ if c.is_ascii_alphabetic() || c == '_' => self.read_ident(),
            _ => return Err(ParseError::UnexpectedChar { ch: c, offset }),
        };
        Ok(Spanned { token, offset })
    }

    fn single(&mut self, token: Token) -> Token {
        self.bump();
        token
    }

    fn read_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    fn read_number(&mut self, start: usize) -> Result<Token, ParseError> {
        self.read_digits();
        if self.peek() == Some('.') {
            self.bump();
            self.read_digits();
        }
        // Exponent only when digits follow, so `2e` lexes as `2` then `e`.
        if matches!(self.peek(), Some('e' | 'E')) {
            let has_exponent = match self.peek_at(1) {
                Some(d) if d.is_ascii_digit() => true,
                Some('+' | '-') => self.peek_at(2).is_some_and(|d| d.is_ascii_digit()),
                _ => false,
            };
            if has_exponent {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                self.read_digits();
            }
        }

        let text = &self.source[start..self.pos];
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Token::Number(v)),
            _ => Err(ParseError::InvalidNumber {
                text: text.to_owned(),
                offset: start,
            }),
        }
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }
        Token::Ident(self.source[start..self.pos].to_owned())
    }
}
