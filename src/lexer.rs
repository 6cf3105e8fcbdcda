use thiserror::Error;

use crate::ast::{PathWord, Token};

/// Errors raised while tokenizing a constraint.
///
/// Positions are character offsets into the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("invalid escape sequence '\\{ch}' at position {position}")]
    InvalidEscape { ch: char, position: usize },

    #[error("invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Offset of the first character of the most recently read token
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    // Stops before a `__` separator
    fn read_segment(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '_' && self.peek_char(1) == Some('_') {
                break;
            }
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn at_separator(&self) -> bool {
        self.current_char() == Some('_') && self.peek_char(1) == Some('_')
    }

    // `data__"owner-name"__isnull` -> [data, "owner-name", isnull]
    fn read_path(&mut self) -> Result<Vec<PathWord>, LexError> {
        let mut words = vec![PathWord::Bare(self.read_segment())];

        while self.at_separator() {
            self.advance();
            self.advance();
            match self.current_char() {
                Some(quote @ ('"' | '\'')) => {
                    words.push(PathWord::Quoted(self.read_string(quote)?));
                }
                _ => words.push(PathWord::Bare(self.read_segment())),
            }
        }
        Ok(words)
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('0') => result.push('\0'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some('u') => {
                            result.push(self.read_unicode_escape()?);
                            continue;
                        }
                        Some(ch) => {
                            return Err(LexError::InvalidEscape {
                                ch,
                                position: self.position,
                            });
                        }
                        None => return Err(LexError::UnterminatedString { position: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    // `\u{1F600}`, positioned on the `u`
    fn read_unicode_escape(&mut self) -> Result<char, LexError> {
        let position = self.position;
        let invalid = LexError::InvalidEscape { ch: 'u', position };

        self.advance();
        if self.current_char() != Some('{') {
            return Err(invalid);
        }
        self.advance();

        let mut hex = String::new();
        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == '}' {
                return u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(invalid);
            }
            hex.push(ch);
        }
        Err(invalid)
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();
        let mut is_float = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let invalid = |text: &str| LexError::InvalidNumber {
            text: text.to_string(),
            position: start,
        };

        if is_float {
            number
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| invalid(&number))
        } else {
            number
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| invalid(&number))
        }
    }

    fn single(&mut self, token: Token) -> Result<Token, LexError> {
        self.advance();
        Ok(token)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        match self.current_char() {
            None => Ok(Token::Eof),
            Some('=') => {
                // Tolerate `==` for readers coming from expression languages
                if self.peek_char(1) == Some('=') {
                    self.advance();
                }
                self.single(Token::Equal)
            }
            Some('&') => self.single(Token::And),
            Some('|') => self.single(Token::Or),
            Some('~') | Some('!') => self.single(Token::Not),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('{') => self.single(Token::LBrace),
            Some('}') => self.single(Token::RBrace),
            Some(',') => self.single(Token::Comma),
            Some(':') => self.single(Token::Colon),
            Some('"') => self.read_string('"').map(Token::String),
            Some('\'') => self.read_string('\'').map(Token::String),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let words = self.read_path()?;

                let keyword = match words.as_slice() {
                    [PathWord::Bare(word)] => match word.as_str() {
                        "and" => Some(Token::And),
                        "or" => Some(Token::Or),
                        "not" => Some(Token::Not),
                        "true" => Some(Token::Boolean(true)),
                        "false" => Some(Token::Boolean(false)),
                        "null" => Some(Token::Null),
                        _ => None,
                    },
                    _ => None,
                };
                Ok(keyword.unwrap_or_else(|| Token::Path(words)))
            }
            Some(ch) => Err(LexError::UnexpectedChar {
                ch,
                position: self.position,
            }),
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or not true false null");
    assert_eq!(lexer.next_token(), Ok(Token::And));
    assert_eq!(lexer.next_token(), Ok(Token::Or));
    assert_eq!(lexer.next_token(), Ok(Token::Not));
    assert_eq!(lexer.next_token(), Ok(Token::Boolean(true)));
    assert_eq!(lexer.next_token(), Ok(Token::Boolean(false)));
    assert_eq!(lexer.next_token(), Ok(Token::Null));
}

#[test]
fn test_lookup() {
    let mut lexer = Lexer::new("~(data__key__isnull = true)");
    assert_eq!(lexer.next_token(), Ok(Token::Not));
    assert_eq!(lexer.next_token(), Ok(Token::LParen));
    assert_eq!(
        lexer.next_token(),
        Ok(Token::Path(vec![
            PathWord::bare("data"),
            PathWord::bare("key"),
            PathWord::bare("isnull"),
        ]))
    );
    assert_eq!(lexer.next_token(), Ok(Token::Equal));
    assert_eq!(lexer.next_token(), Ok(Token::Boolean(true)));
    assert_eq!(lexer.next_token(), Ok(Token::RParen));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_quoted_key_segment() {
    let mut lexer = Lexer::new(r#"data__"a-b"__'0'__isnull"#);
    assert_eq!(
        lexer.next_token(),
        Ok(Token::Path(vec![
            PathWord::bare("data"),
            PathWord::quoted("a-b"),
            PathWord::quoted("0"),
            PathWord::bare("isnull"),
        ]))
    );
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}
