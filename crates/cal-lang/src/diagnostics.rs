//! Conversion from this crate's own error domains to `lsp_types::Diagnostic`.
//!
//! Lex and parse errors carry byte-offset spans (`cal_base::Span`); the LSP
//! wire format wants UTF-16 line/character positions, so every conversion
//! here goes through a caller-supplied [`LineIndex`] built from the same
//! source text that was lexed.

use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Range};

use crate::error::{LexError, LexErrorKind, ParseError, ParseErrorKind, Severity};
use crate::line_index::LineIndex;

const SOURCE: &str = "cal-lang";

pub fn convert_lex_errors(errors: &[LexError], line_index: &LineIndex) -> Vec<Diagnostic> {
    errors.iter().map(|e| lex_error_to_diagnostic(e, line_index)).collect()
}

fn lex_error_to_diagnostic(error: &LexError, line_index: &LineIndex) -> Diagnostic {
    let start = line_index.position(error.span.start);
    let end = line_index.position(error.span.end.max(error.span.start + 1));

    Diagnostic {
        range: Range { start, end },
        severity: Some(DiagnosticSeverity::ERROR),
        code: Some(NumberOrString::String(lex_error_code(&error.kind).to_string())),
        source: Some(SOURCE.to_string()),
        message: error.message.clone(),
        ..Default::default()
    }
}

fn lex_error_code(kind: &LexErrorKind) -> &'static str {
    match kind {
        LexErrorKind::UnterminatedString => "unterminated-string",
        LexErrorKind::UnterminatedBlockComment => "unterminated-block-comment",
        LexErrorKind::UnterminatedQuotedIdentifier => "unterminated-quoted-identifier",
        LexErrorKind::UnexpectedCharacter => "unexpected-character",
    }
}

pub fn convert_parse_errors(errors: &[ParseError], line_index: &LineIndex) -> Vec<Diagnostic> {
    errors.iter().map(|e| parse_error_to_diagnostic(e, line_index)).collect()
}

fn parse_error_to_diagnostic(error: &ParseError, line_index: &LineIndex) -> Diagnostic {
    let start = line_index.position(error.span.start);
    let end = line_index.position(error.span.end.max(error.span.start + 1));

    Diagnostic {
        range: Range { start, end },
        severity: Some(severity_to_lsp(error.kind.severity())),
        code: Some(NumberOrString::String(parse_error_code(&error.kind).to_string())),
        source: Some(SOURCE.to_string()),
        message: error.message.clone(),
        ..Default::default()
    }
}

fn parse_error_code(kind: &ParseErrorKind) -> &'static str {
    match kind {
        ParseErrorKind::CaseBranchMissingColon => "case-branch-missing-colon",
        ParseErrorKind::ExpectedToken => "expected-token",
        ParseErrorKind::UnknownSection => "unknown-section",
        ParseErrorKind::MalformedObjectHeader => "malformed-object-header",
        ParseErrorKind::MissingClosingBrace => "missing-closing-brace",
        ParseErrorKind::MalformedDeclaration => "malformed-declaration",
    }
}

fn severity_to_lsp(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cal_base::Span;
    use crate::error::LexErrorKind;

    #[test]
    fn lex_error_produces_diagnostic_with_code() {
        let line_index = LineIndex::new("OBJECT Table 18 Customer { ' }");
        let error = LexError::new(LexErrorKind::UnterminatedString, "Unterminated string literal", Span::new(28, 31));
        let diagnostics = convert_lex_errors(&[error], &line_index);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diagnostics[0].code, Some(NumberOrString::String("unterminated-string".to_string())));
        assert_eq!(diagnostics[0].source, Some("cal-lang".to_string()));
    }

    #[test]
    fn parse_error_range_reflects_line_and_column() {
        let line_index = LineIndex::new("OBJECT Table 18 Customer {\n  FIELDS\n}");
        let tok = crate::token::Token::new(crate::token::TokenKind::Fields, "FIELDS", 2, 3, 30, 36);
        let error = ParseError::new("Expected { after section name", ParseErrorKind::ExpectedToken, &tok);
        let diagnostics = convert_parse_errors(&[error], &line_index);
        assert_eq!(diagnostics[0].range.start.line, 1);
        assert_eq!(diagnostics[0].range.start.character, 2);
    }

    #[test]
    fn all_parse_error_kinds_have_stable_codes() {
        let kinds = [
            ParseErrorKind::CaseBranchMissingColon,
            ParseErrorKind::ExpectedToken,
            ParseErrorKind::UnknownSection,
            ParseErrorKind::MalformedObjectHeader,
            ParseErrorKind::MissingClosingBrace,
            ParseErrorKind::MalformedDeclaration,
        ];
        for kind in kinds {
            assert!(!parse_error_code(&kind).is_empty());
        }
    }

    #[test]
    fn empty_errors_produce_empty_diagnostics() {
        let line_index = LineIndex::new("OBJECT Table 18 Customer { }");
        assert!(convert_lex_errors(&[], &line_index).is_empty());
        assert!(convert_parse_errors(&[], &line_index).is_empty());
    }
}
