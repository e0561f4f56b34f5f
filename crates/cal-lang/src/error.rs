//! Error types produced by the lexer and parser.
//!
//! Both domains are local and recovered: the pipeline always returns a
//! token stream, a tree, and an error list, even for malformed input.
//! Nothing in this crate panics or propagates a `Result` to the caller of
//! [`crate::lexer::lex`] or [`crate::parser::Parser::parse`].

use cal_base::Span;
use std::fmt;

use crate::token::Token;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A lexical error: unterminated string, unterminated block comment, or a
/// stray character the lexer could not classify.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LexErrorKind {
    UnterminatedString,
    UnterminatedBlockComment,
    UnterminatedQuotedIdentifier,
    UnexpectedCharacter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for LexError {}

/// The kind of a recoverable parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParseErrorKind {
    /// Missing `:` after the last value in a `CaseBranch`.
    CaseBranchMissingColon,
    /// A required token was not found where expected.
    ExpectedToken,
    /// A section header was not recognized.
    UnknownSection,
    /// The object header (`OBJECT <kind> <id> <name>`) was malformed.
    MalformedObjectHeader,
    /// A closing brace was missing at the end of a section or object.
    MissingClosingBrace,
    /// A declaration (VAR entry, PROCEDURE signature) could not be parsed.
    MalformedDeclaration,
}

/// A single recoverable parse error, anchored to the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseError {
    pub message: String,
    pub kind: ParseErrorKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl ParseError {
    pub fn new(message: impl Into<String>, kind: ParseErrorKind, token: &Token) -> Self {
        ParseError {
            message: message.into(),
            kind,
            span: token.span(),
            line: token.line,
            column: token.column,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.message, self.line, self.column)
    }
}

impl std::error::Error for ParseError {}

/// Diagnostic severity, independent of the LSP crate's own enum so that
/// `cal-lang` can decide severity without depending on `lsp_types` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl ParseErrorKind {
    /// Structural errors are `Error`; none of today's parse error kinds are
    /// purely stylistic, but the distinction is kept so future warning-level
    /// kinds (e.g. a deprecated section) slot in without changing callers.
    pub fn severity(self) -> Severity {
        Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn parse_error_display_includes_position() {
        let tok = Token::new(TokenKind::Colon, ":", 3, 7, 20, 21);
        let err = ParseError::new("Expected : after case branch value", ParseErrorKind::CaseBranchMissingColon, &tok);
        let s = format!("{err}");
        assert!(s.contains("3:7"));
    }
}
