use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -1.0
    /// ```
    Float(f64),

    /// Integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -10
    /// ```
    Integer(i64),

    /// String literal enclosed in double or single quotes
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'item #1'
    /// ```
    String(String),

    /// Boolean values
    Boolean(bool),

    /// Null value
    Null,

    // Paths
    /// Field path with optional key segments and lookup, joined by `__`
    ///
    /// Starts with a letter or underscore, followed by letters, digits, or
    /// underscores. A key segment may instead be a quoted string, which is
    /// always an object key.
    ///
    /// # Examples
    /// ```text
    /// price
    /// price__gte
    /// data__tags__0__isnull
    /// data__"owner-name"__isnull
    /// ```
    Path(Vec<PathWord>),

    // Operators
    /// Assignment of the lookup operand (`=`)
    Equal,

    /// Logical AND (`and` or `&`)
    And,

    /// Logical OR (`or` or `|`)
    Or,

    /// Logical NOT (`not`, `~` or `!`)
    Not,

    // Delimiters
    /// Left parenthesis `(`
    LParen,

    /// Right parenthesis `)`
    RParen,

    /// Left bracket `[` (list literal)
    LBracket,

    /// Right bracket `]`
    RBracket,

    /// Left brace `{` (object literal)
    LBrace,

    /// Right brace `}`
    RBrace,

    /// Comma `,`
    Comma,

    /// Colon `:` (object literal)
    Colon,

    /// End of input
    Eof,
}

/// One `__`-separated word of a [`Token::Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathWord {
    /// Unquoted word; may be a field, a key, an index or a lookup name
    Bare(String),
    /// Quoted key, taken literally
    Quoted(String),
}

impl PathWord {
    pub fn bare(word: impl Into<String>) -> Self {
        PathWord::Bare(word.into())
    }

    pub fn quoted(word: impl Into<String>) -> Self {
        PathWord::Quoted(word.into())
    }
}

impl fmt::Display for PathWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathWord::Bare(word) => f.write_str(word),
            PathWord::Quoted(word) => write!(f, "{word:?}"),
        }
    }
}
