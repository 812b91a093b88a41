//! Implementation of the Rebeca lexer
//!
//! The scanning itself is handled by logos; this wrapper classifies words against the
//! dialect's keyword set and turns anything logos rejects into an `Other` token, so the
//! token stream always covers the whole input.

use crate::dialect::Dialect;
use crate::lexer::tokens::{RawToken, Token, TokenKind};
use logos::Logos;

/// Streaming lexer over a source string for one dialect.
pub struct RebecaLexer<'a> {
    inner: logos::Lexer<'a, RawToken>,
    dialect: Dialect,
}

impl<'a> RebecaLexer<'a> {
    pub fn new(source: &'a str, dialect: Dialect) -> Self {
        Self {
            inner: RawToken::lexer(source),
            dialect,
        }
    }

    /// Byte range of the token most recently returned.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.inner.span()
    }

    fn classify(&self, raw: RawToken, text: &str) -> TokenKind {
        match raw {
            RawToken::Whitespace => TokenKind::Whitespace,
            RawToken::Newline => TokenKind::Newline,
            RawToken::LineComment => TokenKind::LineComment,
            RawToken::BlockComment => TokenKind::BlockComment,
            RawToken::String => TokenKind::String,
            RawToken::Char => TokenKind::Char,
            RawToken::Word if self.dialect.spec().is_keyword(text) => TokenKind::Keyword,
            RawToken::Word => TokenKind::Identifier,
            RawToken::Number => TokenKind::Number,
            RawToken::OpenBrace => TokenKind::OpenBrace,
            RawToken::CloseBrace => TokenKind::CloseBrace,
            RawToken::OpenParen => TokenKind::OpenParen,
            RawToken::CloseParen => TokenKind::CloseParen,
            RawToken::OpenBracket => TokenKind::OpenBracket,
            RawToken::CloseBracket => TokenKind::CloseBracket,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Operator => TokenKind::Operator,
            RawToken::Other => TokenKind::Other,
        }
    }
}

impl<'a> Iterator for RebecaLexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let text = self.inner.slice();
        let kind = match result {
            Ok(raw) => self.classify(raw, text),
            Err(()) => TokenKind::Other,
        };
        Some(Token::new(kind, text))
    }
}

/// Convenience function to tokenize a string and collect all tokens
pub fn tokenize(source: &str, dialect: Dialect) -> Vec<Token<'_>> {
    RebecaLexer::new(source, dialect).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(source: &str, dialect: Dialect) -> Vec<TokenKind> {
        tokenize(source, dialect).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_statement() {
        assert_eq!(
            kinds("a = -1;", Dialect::Model),
            vec![
                Identifier, Whitespace, Operator, Whitespace, Operator, Number, Semicolon
            ]
        );
    }

    #[test]
    fn test_keywords_depend_on_dialect() {
        assert_eq!(kinds("msgsrv", Dialect::Model), vec![Keyword]);
        assert_eq!(kinds("msgsrv", Dialect::Property), vec![Identifier]);
        assert_eq!(kinds("LTL", Dialect::Property), vec![Keyword]);
        assert_eq!(kinds("LTL", Dialect::Model), vec![Identifier]);
    }

    #[test]
    fn test_identifier_characters() {
        let tokens = tokenize("_tmp$1 x2", Dialect::Model);
        assert_eq!(tokens[0], Token::new(Identifier, "_tmp$1"));
        assert_eq!(tokens[2], Token::new(Identifier, "x2"));
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(
            kinds("{}()[];,.:", Dialect::Model),
            vec![
                OpenBrace,
                CloseBrace,
                OpenParen,
                CloseParen,
                OpenBracket,
                CloseBracket,
                Semicolon,
                Comma,
                Dot,
                Colon
            ]
        );
    }

    #[test]
    fn test_comment_excludes_line_terminator() {
        let tokens = tokenize("// note\r\nx", Dialect::Model);
        assert_eq!(tokens[0], Token::new(LineComment, "// note"));
        assert_eq!(tokens[1], Token::new(Newline, "\r\n"));
        assert_eq!(tokens[2], Token::new(Identifier, "x"));
    }

    #[test]
    fn test_spans_track_offsets() {
        let mut lexer = RebecaLexer::new("ab cd", Dialect::Model);
        lexer.next();
        assert_eq!(lexer.span(), 0..2);
        lexer.next();
        lexer.next();
        assert_eq!(lexer.span(), 3..5);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("", Dialect::Model).is_empty());
    }
}
