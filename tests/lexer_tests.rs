// tests/lexer_tests.rs

use fieldcheck::ast::{PathWord, Token};
use fieldcheck::lexer::{LexError, Lexer};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = vec![];
    loop {
        let token = lexer.next_token().unwrap();
        if token == Token::Eof {
            return out;
        }
        out.push(token);
    }
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("=", Token::Equal),
        ("&", Token::And),
        ("|", Token::Or),
        ("~", Token::Not),
        ("!", Token::Not),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("{", Token::LBrace),
        ("}", Token::RBrace),
        (",", Token::Comma),
        (":", Token::Colon),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_double_equal_is_equal() {
    assert_eq!(tokens("=="), vec![Token::Equal]);
}

// ============================================================================
// Words and Keywords
// ============================================================================

#[test]
fn test_keywords() {
    assert_eq!(
        tokens("and or not true false null"),
        vec![
            Token::And,
            Token::Or,
            Token::Not,
            Token::Boolean(true),
            Token::Boolean(false),
            Token::Null,
        ]
    );
}

#[test]
fn test_paths_keep_double_underscores() {
    assert_eq!(
        tokens("data__items__0__isnull _private"),
        vec![
            Token::Path(vec![
                PathWord::bare("data"),
                PathWord::bare("items"),
                PathWord::bare("0"),
                PathWord::bare("isnull"),
            ]),
            Token::Path(vec![PathWord::bare("_private")]),
        ]
    );
}

#[test]
fn test_quoted_segments_are_literal_keys() {
    assert_eq!(
        tokens(r#"data__"owner-name"__'a__b'__isnull"#),
        vec![Token::Path(vec![
            PathWord::bare("data"),
            PathWord::quoted("owner-name"),
            PathWord::quoted("a__b"),
            PathWord::bare("isnull"),
        ])]
    );
}

#[test]
fn test_triple_underscore_starts_next_segment() {
    assert_eq!(
        tokens("data___k"),
        vec![Token::Path(vec![PathWord::bare("data"), PathWord::bare("_k")])]
    );
}

#[test]
fn test_keyword_prefix_is_a_path() {
    assert_eq!(tokens("android"), vec![Token::Path(vec![PathWord::bare("android")])]);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("42 -7 3.25 -0.5"),
        vec![
            Token::Integer(42),
            Token::Integer(-7),
            Token::Float(3.25),
            Token::Float(-0.5),
        ]
    );
}

#[test]
fn test_strings_with_escapes() {
    assert_eq!(
        tokens(r#""a\"b" 'it\'s' "tab\there" "\u{e9}""#),
        vec![
            Token::String("a\"b".to_string()),
            Token::String("it's".to_string()),
            Token::String("tab\there".to_string()),
            Token::String("é".to_string()),
        ]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new("  \"open");
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnterminatedString { position: 2 })
    );
}

#[test]
fn test_invalid_escape() {
    let mut lexer = Lexer::new(r#""\q""#);
    assert_eq!(
        lexer.next_token(),
        Err(LexError::InvalidEscape { ch: 'q', position: 2 })
    );
}

#[test]
fn test_unexpected_character() {
    let mut lexer = Lexer::new("price > 3");
    assert_eq!(
        lexer.next_token(),
        Ok(Token::Path(vec![PathWord::bare("price")]))
    );
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnexpectedChar { ch: '>', position: 6 })
    );
}

#[test]
fn test_integer_overflow() {
    let mut lexer = Lexer::new("99999999999999999999");
    assert!(matches!(
        lexer.next_token(),
        Err(LexError::InvalidNumber { position: 0, .. })
    ));
}

#[test]
fn test_token_start_skips_whitespace() {
    let mut lexer = Lexer::new("   price");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token_start(), 3);
}
