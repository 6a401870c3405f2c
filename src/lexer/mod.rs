//! Maximal-munch tokenizer over a [`Source`] character stream.
//!
//! Tokens are built by a fixed sequence of builders (comment, identifier,
//! operator, number, string, end-of-text); the first builder that accepts the
//! current character wins. Every token carries the position it started at.
//! The lexer has two modes: the raw mode returns comment tokens, the
//! comment-skipping mode (used for parsing) silently drops them.

mod token;

pub use token::*;

use crate::source::{Source, ETX};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{self, Display};

pub const MAX_IDENTIFIER_LENGTH: usize = 255;
pub const MAX_STRING_LENGTH: usize = 10_000;
pub const MAX_COMMENT_LENGTH: usize = 255;
pub const MAX_MULTILINE_COMMENT_LENGTH: usize = 10_024;

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert("const", TokenKind::Const);
    m.insert("let", TokenKind::Let);
    m.insert("int", TokenKind::IntType);
    m.insert("float", TokenKind::FloatType);
    m.insert("str", TokenKind::StrType);
    m.insert("bool", TokenKind::BoolType);
    m.insert("func", TokenKind::FuncType);
    m.insert("void", TokenKind::VoidType);
    m.insert("def", TokenKind::Def);
    m.insert("return", TokenKind::Return);
    m.insert("if", TokenKind::If);
    m.insert("elif", TokenKind::Elif);
    m.insert("else", TokenKind::Else);
    m.insert("while", TokenKind::While);
    m.insert("and", TokenKind::And);
    m.insert("or", TokenKind::Or);
    m.insert("not", TokenKind::Not);
    m.insert("null", TokenKind::NullValue);
    m.insert("true", TokenKind::TrueValue);
    m.insert("false", TokenKind::FalseValue);

    m
});

#[derive(Debug, Clone, PartialEq)]
pub struct LexerError {
    pub message: String,
    pub position: Position,
}

impl LexerError {
    fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Line: {} Column: {}",
            self.message, self.position.line, self.position.column
        )
    }
}

impl Error for LexerError {}

pub type LexResult<T> = Result<T, LexerError>;

pub struct Lexer {
    source: Source,
    token: Option<Token>,
    skip_comments: bool,
}

impl Lexer {
    /// A raw lexer which also returns comment tokens.
    pub fn new(source: Source) -> Self {
        Self {
            source,
            token: None,
            skip_comments: false,
        }
    }

    /// A lexer for parsing: comment tokens are dropped silently.
    pub fn skipping_comments(source: Source) -> Self {
        Self {
            source,
            token: None,
            skip_comments: true,
        }
    }

    /// The last token built by [`Lexer::build_next_token`].
    pub fn current_token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn build_next_token(&mut self) -> LexResult<Token> {
        loop {
            let token = self.build_token()?;

            if self.skip_comments && matches!(token.kind, TokenKind::Comment(_)) {
                continue;
            }

            self.token = Some(token.clone());
            return Ok(token);
        }
    }

    fn build_token(&mut self) -> LexResult<Token> {
        self.skip_whitespace();

        let position = self.position();

        if let Some(kind) = self.try_build_comment()? {
            return Ok(Token::new(kind, position));
        }

        if let Some(kind) = self.try_build_identifier(position)? {
            return Ok(Token::new(kind, position));
        }

        if let Some(kind) = self.try_build_operator(position)? {
            return Ok(Token::new(kind, position));
        }

        if let Some(kind) = self.try_build_number(position)? {
            return Ok(Token::new(kind, position));
        }

        if let Some(kind) = self.try_build_string(position)? {
            return Ok(Token::new(kind, position));
        }

        if self.source.current_char() == ETX {
            return Ok(Token::new(TokenKind::Etx, position));
        }

        Err(LexerError::new(
            format!(
                "Failed to build token! Unexpected character `{}`.",
                self.source.current_char()
            ),
            position,
        ))
    }

    fn position(&self) -> Position {
        Position::new(self.source.line(), self.source.column(), self.source.offset())
    }

    fn skip_whitespace(&mut self) {
        while self.source.current_char().is_whitespace() {
            self.source.advance();
        }
    }

    /// Handles everything starting with `/`: `//` line comments, `/* */`
    /// block comments, and the bare division operator.
    fn try_build_comment(&mut self) -> LexResult<Option<TokenKind>> {
        if self.source.current_char() != '/' {
            return Ok(None);
        }

        let position = self.position();
        self.source.advance();

        match self.source.current_char() {
            '*' => self.build_multiline_comment(position).map(Some),
            '/' => self.build_line_comment(position).map(Some),
            _ => Ok(Some(TokenKind::Div)),
        }
    }

    fn build_line_comment(&mut self, position: Position) -> LexResult<TokenKind> {
        // step past the second `/`
        self.source.advance();

        let mut collected = String::new();
        let mut length = 0;

        while length <= MAX_COMMENT_LENGTH
            && self.source.current_char() != ETX
            && self.source.current_char() != '\n'
        {
            collected.push(self.source.current_char());
            length += 1;
            self.source.advance();
        }

        if length > MAX_COMMENT_LENGTH {
            return Err(LexerError::new("Too long comment!", position));
        }

        Ok(TokenKind::Comment(collected))
    }

    /// Block comments may not nest. A lone `*` is part of the comment; only
    /// `*/` terminates it.
    fn build_multiline_comment(&mut self, position: Position) -> LexResult<TokenKind> {
        // step past the `*`
        self.source.advance();

        let mut collected = String::new();
        let mut length = 0;

        loop {
            let current = self.source.current_char();

            if current == ETX {
                return Err(LexerError::new(
                    "Multiline comment was not closed! Reached end of text!",
                    position,
                ));
            }

            if current == '*' {
                self.source.advance();
                if self.source.current_char() == '/' {
                    self.source.advance();
                    break;
                }
                collected.push('*');
                length += 1;
                continue;
            }

            if length > MAX_MULTILINE_COMMENT_LENGTH {
                return Err(LexerError::new("Too long multiline comment!", position));
            }

            collected.push(current);
            length += 1;
            self.source.advance();
        }

        Ok(TokenKind::Comment(collected))
    }

    fn try_build_identifier(&mut self, position: Position) -> LexResult<Option<TokenKind>> {
        let current = self.source.current_char();
        if !current.is_alphabetic() && current != '_' {
            return Ok(None);
        }

        let mut collected = String::new();
        let mut length = 0;

        while length <= MAX_IDENTIFIER_LENGTH
            && (self.source.current_char().is_alphanumeric() || self.source.current_char() == '_')
        {
            collected.push(self.source.current_char());
            length += 1;
            self.source.advance();
        }

        if length > MAX_IDENTIFIER_LENGTH {
            return Err(LexerError::new("Too long identifier!", position));
        }

        if let Some(keyword) = KEYWORDS.get(collected.as_str()) {
            return Ok(Some(keyword.clone()));
        }

        Ok(Some(TokenKind::Id(collected)))
    }

    /// Builds one- or two-character operators with maximal munch. A `!` or
    /// `?` that does not complete a two-character operator is an error.
    fn try_build_operator(&mut self, position: Position) -> LexResult<Option<TokenKind>> {
        let kind = match self.source.current_char() {
            '=' => {
                self.source.advance();
                match self.source.current_char() {
                    '=' => {
                        self.source.advance();
                        TokenKind::Equal
                    }
                    '>' => {
                        self.source.advance();
                        TokenKind::Arrow
                    }
                    _ => TokenKind::Assign,
                }
            }
            '!' => {
                self.source.advance();
                if self.source.current_char() == '=' {
                    self.source.advance();
                    TokenKind::NotEqual
                } else {
                    return Err(LexerError::new(
                        "Failed to build operator! `!` must be followed by `=`.",
                        position,
                    ));
                }
            }
            '?' => {
                self.source.advance();
                match self.source.current_char() {
                    ':' => {
                        self.source.advance();
                        TokenKind::TypeAssignNullable
                    }
                    '?' => {
                        self.source.advance();
                        TokenKind::NullCoalesce
                    }
                    _ => {
                        return Err(LexerError::new(
                            "Failed to build operator! `?` must be followed by `?` or `:`.",
                            position,
                        ));
                    }
                }
            }
            '>' => {
                self.source.advance();
                if self.source.current_char() == '=' {
                    self.source.advance();
                    TokenKind::GreaterOrEqual
                } else {
                    TokenKind::GreaterThan
                }
            }
            '<' => {
                self.source.advance();
                if self.source.current_char() == '=' {
                    self.source.advance();
                    TokenKind::LessOrEqual
                } else {
                    TokenKind::LessThan
                }
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Times,
            '%' => TokenKind::Modulo,
            ':' => TokenKind::TypeAssign,
            _ => return Ok(None),
        };

        if matches!(
            kind,
            TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Times
                | TokenKind::Modulo
                | TokenKind::TypeAssign
        ) {
            self.source.advance();
        }

        Ok(Some(kind))
    }

    fn try_build_number(&mut self, position: Position) -> LexResult<Option<TokenKind>> {
        if !self.source.current_char().is_ascii_digit() {
            return Ok(None);
        }

        let mut collected = String::new();

        if self.source.current_char() == '0' {
            collected.push('0');
            self.source.advance();

            if self.source.current_char().is_ascii_digit() {
                return Err(LexerError::new(
                    "Failed to build number. Leading 0 cannot be followed by another digit.",
                    position,
                ));
            }
        } else {
            while self.source.current_char().is_ascii_digit() {
                collected.push(self.source.current_char());
                self.source.advance();
            }
        }

        if self.source.current_char() != '.' {
            let value = collected.parse::<i64>().map_err(|_| {
                LexerError::new("Failed to build number. Integer value out of range.", position)
            })?;
            return Ok(Some(TokenKind::IntValue(value)));
        }

        collected.push('.');
        self.source.advance();

        if !self.source.current_char().is_ascii_digit() {
            return Err(LexerError::new(
                "Failed to build number. Received `.` which was not followed by digit.",
                position,
            ));
        }

        while self.source.current_char().is_ascii_digit() {
            collected.push(self.source.current_char());
            self.source.advance();
        }

        if self.source.current_char() == 'e' || self.source.current_char() == 'E' {
            collected.push(self.source.current_char());
            self.source.advance();

            if self.source.current_char() == '-' {
                collected.push('-');
                self.source.advance();
            }

            if !self.source.current_char().is_ascii_digit() {
                return Err(LexerError::new(
                    "Failed to build number. Received `e` which was not followed by exponent.",
                    position,
                ));
            }

            while self.source.current_char().is_ascii_digit() {
                collected.push(self.source.current_char());
                self.source.advance();
            }
        }

        let value = collected
            .parse::<f64>()
            .map_err(|_| LexerError::new("Failed to build number.", position))?;

        Ok(Some(TokenKind::FloatValue(value)))
    }

    /// Strings use single or double quotes, consistently. A backslash escapes
    /// the opening quote character and itself; any other escape is preserved
    /// verbatim as two characters.
    fn try_build_string(&mut self, position: Position) -> LexResult<Option<TokenKind>> {
        let quote = self.source.current_char();
        if quote != '"' && quote != '\'' {
            return Ok(None);
        }

        self.source.advance();

        let mut collected = String::new();
        let mut length = 0;

        while length <= MAX_STRING_LENGTH && self.source.current_char() != quote {
            let current = self.source.current_char();

            if current == ETX {
                return Err(LexerError::new(
                    format!("Failed to build string! Expected `{quote}`, got ETX."),
                    position,
                ));
            }

            if current == '\\' {
                self.source.advance();
                let escaped = self.source.current_char();

                if escaped == quote || escaped == '\\' {
                    collected.push(escaped);
                } else {
                    collected.push('\\');
                    collected.push(escaped);
                }
            } else {
                collected.push(current);
            }

            length += 1;
            self.source.advance();
        }

        if length > MAX_STRING_LENGTH {
            return Err(LexerError::new(
                "Failed to build string! Received content which is too long.",
                position,
            ));
        }

        // step past the closing quote
        self.source.advance();

        Ok(Some(TokenKind::StrValue(collected)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(text: &str) -> LexResult<Vec<TokenKind>> {
        let mut lexer = Lexer::new(Source::from_string(text));
        let mut kinds = vec![];

        loop {
            let token = lexer.build_next_token()?;
            let done = token.kind == TokenKind::Etx;
            kinds.push(token.kind);
            if done {
                return Ok(kinds);
            }
        }
    }

    #[test]
    fn test_lex_empty_source() {
        assert_eq!(lex_all(""), Ok(vec![TokenKind::Etx]));
    }

    #[test]
    fn test_lex_identifier() {
        assert_eq!(
            lex_all("letter"),
            Ok(vec![TokenKind::Id("letter".into()), TokenKind::Etx])
        );
    }

    #[test]
    fn test_lex_identifier_similar_to_keyword() {
        assert_eq!(
            lex_all("constt"),
            Ok(vec![TokenKind::Id("constt".into()), TokenKind::Etx])
        );
    }

    #[test]
    fn test_lex_keywords() {
        assert_eq!(
            lex_all("const let int float str bool func void def return if elif else while and or not"),
            Ok(vec![
                TokenKind::Const,
                TokenKind::Let,
                TokenKind::IntType,
                TokenKind::FloatType,
                TokenKind::StrType,
                TokenKind::BoolType,
                TokenKind::FuncType,
                TokenKind::VoidType,
                TokenKind::Def,
                TokenKind::Return,
                TokenKind::If,
                TokenKind::Elif,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_reserved_values() {
        assert_eq!(
            lex_all("true false null"),
            Ok(vec![
                TokenKind::TrueValue,
                TokenKind::FalseValue,
                TokenKind::NullValue,
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_too_long_identifier() {
        let text = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(lex_all(&text).is_err());
    }

    #[test]
    fn test_lex_identifier_at_limit() {
        let text = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert_eq!(
            lex_all(&text),
            Ok(vec![TokenKind::Id(text.clone()), TokenKind::Etx])
        );
    }

    #[test]
    fn test_lex_integers() {
        assert_eq!(
            lex_all("0 1 123124124124"),
            Ok(vec![
                TokenKind::IntValue(0),
                TokenKind::IntValue(1),
                TokenKind::IntValue(123124124124),
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_integer_with_leading_zero() {
        assert!(lex_all("01").is_err());
    }

    #[test]
    fn test_lex_floats() {
        assert_eq!(
            lex_all("0.5 1.25 1.2e1 1.2E-10"),
            Ok(vec![
                TokenKind::FloatValue(0.5),
                TokenKind::FloatValue(1.25),
                TokenKind::FloatValue(12.0),
                TokenKind::FloatValue(1.2e-10),
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_float_with_trailing_dot() {
        assert!(lex_all("1.").is_err());
    }

    #[test]
    fn test_lex_float_with_dangling_exponent() {
        assert!(lex_all("1.2e").is_err());
        assert!(lex_all("1.2e-").is_err());
        assert!(lex_all("1.2e+3").is_err());
    }

    #[test]
    fn test_lex_exponent_requires_fraction() {
        // without a decimal point, `e5` is a trailing identifier
        assert_eq!(
            lex_all("1e5"),
            Ok(vec![
                TokenKind::IntValue(1),
                TokenKind::Id("e5".into()),
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_negative_number_is_minus_then_number() {
        assert_eq!(
            lex_all("-1"),
            Ok(vec![
                TokenKind::Minus,
                TokenKind::IntValue(1),
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_strings() {
        assert_eq!(
            lex_all(r#""hello" 'world'"#),
            Ok(vec![
                TokenKind::StrValue("hello".into()),
                TokenKind::StrValue("world".into()),
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_string_escapes() {
        assert_eq!(
            lex_all(r#""a \" b""#),
            Ok(vec![TokenKind::StrValue(r#"a " b"#.into()), TokenKind::Etx])
        );
        assert_eq!(
            lex_all(r#""a \\ b""#),
            Ok(vec![TokenKind::StrValue(r"a \ b".into()), TokenKind::Etx])
        );
        // any other escape is preserved verbatim
        assert_eq!(
            lex_all(r#""a \n b""#),
            Ok(vec![TokenKind::StrValue(r"a \n b".into()), TokenKind::Etx])
        );
    }

    #[test]
    fn test_lex_string_other_quote_inside() {
        assert_eq!(
            lex_all(r#""it's fine""#),
            Ok(vec![TokenKind::StrValue("it's fine".into()), TokenKind::Etx])
        );
    }

    #[test]
    fn test_lex_unterminated_string() {
        assert!(lex_all("\"abc").is_err());
    }

    #[test]
    fn test_lex_line_comment() {
        assert_eq!(
            lex_all("1 // rest of the line\n2"),
            Ok(vec![
                TokenKind::IntValue(1),
                TokenKind::Comment(" rest of the line".into()),
                TokenKind::IntValue(2),
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_multiline_comment() {
        assert_eq!(
            lex_all("1 /* a\nb */ 2"),
            Ok(vec![
                TokenKind::IntValue(1),
                TokenKind::Comment(" a\nb ".into()),
                TokenKind::IntValue(2),
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_multiline_comment_with_lone_star() {
        assert_eq!(
            lex_all("/* a * b */"),
            Ok(vec![TokenKind::Comment(" a * b ".into()), TokenKind::Etx])
        );
    }

    #[test]
    fn test_lex_unterminated_multiline_comment() {
        assert!(lex_all("/* abc").is_err());
    }

    #[test]
    fn test_skipping_comments_mode() {
        let mut lexer = Lexer::skipping_comments(Source::from_string("1 // comment\n2"));
        assert_eq!(
            lexer.build_next_token().map(|t| t.kind),
            Ok(TokenKind::IntValue(1))
        );
        assert_eq!(
            lexer.build_next_token().map(|t| t.kind),
            Ok(TokenKind::IntValue(2))
        );
        assert_eq!(lexer.build_next_token().map(|t| t.kind), Ok(TokenKind::Etx));
    }

    #[test]
    fn test_lex_one_char_operators() {
        assert_eq!(
            lex_all("( ) { } , ; + - * / % = > < :"),
            Ok(vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Times,
                TokenKind::Div,
                TokenKind::Modulo,
                TokenKind::Assign,
                TokenKind::GreaterThan,
                TokenKind::LessThan,
                TokenKind::TypeAssign,
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_two_char_operators() {
        assert_eq!(
            lex_all("== != >= <= => ?? ?:"),
            Ok(vec![
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::GreaterOrEqual,
                TokenKind::LessOrEqual,
                TokenKind::Arrow,
                TokenKind::NullCoalesce,
                TokenKind::TypeAssignNullable,
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_maximal_munch_without_spaces() {
        assert_eq!(
            lex_all("a==b"),
            Ok(vec![
                TokenKind::Id("a".into()),
                TokenKind::Equal,
                TokenKind::Id("b".into()),
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_lex_incomplete_two_char_operators() {
        assert!(lex_all("!").is_err());
        assert!(lex_all("?").is_err());
        assert!(lex_all("? :").is_err());
    }

    #[test]
    fn test_lex_unknown_character() {
        assert!(lex_all("@").is_err());
    }

    #[test]
    fn test_lex_declaration() {
        assert_eq!(
            lex_all("let foo?: int = 42;"),
            Ok(vec![
                TokenKind::Let,
                TokenKind::Id("foo".into()),
                TokenKind::TypeAssignNullable,
                TokenKind::IntType,
                TokenKind::Assign,
                TokenKind::IntValue(42),
                TokenKind::Semicolon,
                TokenKind::Etx,
            ])
        );
    }

    #[test]
    fn test_current_token_tracks_last_built() {
        let mut lexer = Lexer::new(Source::from_string("let x"));
        assert!(lexer.current_token().is_none());

        let token = lexer.build_next_token().unwrap();
        assert_eq!(lexer.current_token(), Some(&token));

        let token = lexer.build_next_token().unwrap();
        assert_eq!(lexer.current_token(), Some(&token));
        assert_eq!(token.kind, TokenKind::Id("x".into()));
    }

    #[test]
    fn test_token_positions() {
        let mut lexer = Lexer::new(Source::from_string("let x\n= 1;"));

        let token = lexer.build_next_token().unwrap();
        assert_eq!((token.position.line, token.position.column), (1, 1));

        let token = lexer.build_next_token().unwrap();
        assert_eq!((token.position.line, token.position.column), (1, 5));

        let token = lexer.build_next_token().unwrap();
        assert_eq!((token.position.line, token.position.column), (2, 1));
    }

    #[test]
    fn test_token_offsets_are_monotonic() {
        let mut lexer = Lexer::new(Source::from_string("def f(): int => { return 1; }"));
        let mut previous = 0;

        loop {
            let token = lexer.build_next_token().unwrap();
            assert!(token.position.offset >= previous);
            previous = token.position.offset;
            if token.kind == TokenKind::Etx {
                break;
            }
        }
    }
}
