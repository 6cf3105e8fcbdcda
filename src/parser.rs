use std::{collections::HashMap, mem};

use thiserror::Error;

use crate::{
    ast::{Expr, KeyPath, KeySegment, LookupExpr, LookupKind, PathWord, Token},
    lexer::{LexError, Lexer},
    value::Value,
};

/// Errors raised while parsing a constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at position {position}")]
    Unexpected {
        expected: &'static str,
        found: String,
        position: usize,
    },

    #[error("empty segment in path '{path}' at position {position}")]
    EmptySegment { path: String, position: usize },

    #[error("path '{path}' names a lookup but no field at position {position}")]
    MissingField { path: String, position: usize },
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_start: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_start = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_start,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_start = self.lexer.token_start();
        Ok(())
    }

    fn unexpected<T>(&self, expected: &'static str) -> Result<T, ParseError> {
        Err(ParseError::Unexpected {
            expected,
            found: describe(&self.current_token),
            position: self.current_start,
        })
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return self.unexpected(what);
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    /// Parse a lookup, a parenthesized group, or a negation
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match &self.current_token {
            Token::Not => {
                self.advance()?;
                let operand = self.parse_unary()?; // Right-associative
                Ok(Expr::Not(Box::new(operand)))
            }
            Token::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RParen, "')'")?;
                Ok(expr)
            }
            Token::Path(_) => self.parse_lookup(),
            _ => self.unexpected("a lookup, '(' or 'not'"),
        }
    }

    fn parse_lookup(&mut self) -> Result<Expr, ParseError> {
        let position = self.current_start;
        let Token::Path(words) = mem::replace(&mut self.current_token, Token::Eof) else {
            return self.unexpected("a lookup path");
        };
        self.advance()?;

        let (field, path, lookup) = split_path(words, position)?;

        self.expect(Token::Equal, "'='")?;
        let operand = self.parse_literal()?;

        Ok(Expr::Lookup(LookupExpr {
            field,
            path,
            lookup,
            operand,
        }))
    }

    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        let value = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Null => Value::Null,
            Token::Boolean(b) => Value::Boolean(b),
            Token::Integer(n) => Value::Integer(n),
            Token::Float(n) => Value::Float(n),
            Token::String(s) => Value::String(s),
            Token::LBracket => {
                self.advance()?;
                return self.parse_list_literal();
            }
            Token::LBrace => {
                self.advance()?;
                return self.parse_object_literal();
            }
            token => {
                self.current_token = token;
                return self.unexpected("a literal");
            }
        };
        self.advance()?;
        Ok(value)
    }

    fn parse_list_literal(&mut self) -> Result<Value, ParseError> {
        let mut elements = vec![];

        while !self.check(&Token::RBracket) {
            elements.push(self.parse_literal()?);

            if !self.check(&Token::RBracket) {
                self.expect(Token::Comma, "',' or ']'")?;
            }
        }

        self.expect(Token::RBracket, "']'")?;
        Ok(Value::Array(elements))
    }

    fn parse_object_literal(&mut self) -> Result<Value, ParseError> {
        let mut pairs = HashMap::new();

        while !self.check(&Token::RBrace) {
            let key = match &self.current_token {
                Token::String(s) => s.clone(),
                Token::Path(words) => match words.as_slice() {
                    [PathWord::Bare(word)] => word.clone(),
                    _ => return self.unexpected("an object key"),
                },
                _ => return self.unexpected("an object key"),
            };
            self.advance()?;

            self.expect(Token::Colon, "':'")?;

            let value = self.parse_literal()?;
            pairs.insert(key, value);

            if !self.check(&Token::RBrace) {
                self.expect(Token::Comma, "',' or '}'")?;
            }
        }

        self.expect(Token::RBrace, "'}'")?;
        Ok(Value::Object(pairs))
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut children = vec![self.parse_unary()?];

        while self.check(&Token::And) {
            self.advance()?;
            children.push(self.parse_unary()?);
        }

        Ok(collapse(children, Expr::And))
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut children = vec![self.parse_and()?];

        while self.check(&Token::Or) {
            self.advance()?;
            children.push(self.parse_and()?);
        }

        Ok(collapse(children, Expr::Or))
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parse a complete constraint; trailing input is an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return self.unexpected("end of input");
        }
        Ok(expr)
    }
}

/// Parses constraint text in one call.
///
/// ```
/// use fieldcheck::{ast::LookupKind, parse_constraint, Expr};
///
/// let expr = parse_constraint("data__key__isnull = true").unwrap();
/// let Expr::Lookup(leaf) = expr else { unreachable!() };
/// assert_eq!(leaf.field, "data");
/// assert_eq!(leaf.lookup, LookupKind::IsNull);
/// ```
pub fn parse_constraint(input: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(input))?.parse()
}

fn collapse(mut children: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if children.len() == 1 {
        children.remove(0)
    } else {
        wrap(children)
    }
}

// `data__tags__0__isnull` -> ("data", [tags, 0], isnull)
fn split_path(
    mut words: Vec<PathWord>,
    position: usize,
) -> Result<(String, KeyPath, LookupKind), ParseError> {
    let path = join_words(&words);
    if words.iter().any(|w| matches!(w, PathWord::Bare(s) if s.is_empty())) {
        return Err(ParseError::EmptySegment { path, position });
    }

    let lookup = match words.last() {
        Some(PathWord::Bare(word)) => LookupKind::from_name(word),
        _ => None,
    };
    let lookup = match lookup {
        Some(kind) => {
            words.pop();
            kind
        }
        None => LookupKind::Exact,
    };

    let mut words = words.into_iter();
    let field = match words.next() {
        Some(PathWord::Bare(field)) => field,
        _ => return Err(ParseError::MissingField { path, position }),
    };

    let segments = words
        .map(|word| match word {
            PathWord::Bare(word) => KeySegment::from_word(&word),
            PathWord::Quoted(key) => KeySegment::Key(key),
        })
        .collect();

    Ok((field, KeyPath::new(segments), lookup))
}

fn join_words(words: &[PathWord]) -> String {
    words
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("__")
}

fn describe(token: &Token) -> String {
    match token {
        Token::Eof => "end of input".to_string(),
        Token::Path(words) => format!("'{}'", join_words(words)),
        Token::String(s) => format!("{s:?}"),
        other => format!("{other:?}"),
    }
}
