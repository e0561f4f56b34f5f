//! Tokenizer for C/AL source text.
//!
//! Produces a flat token stream plus an independent error list; the lexer
//! never stops early on malformed input. The interesting part is the mode
//! stack that drives context-sensitive keyword downgrading (see the module
//! doc on [`crate::token`]): the 11 downgradable section words read back as
//! plain identifiers while the cursor is inside a `FIELDS`, `KEYS`,
//! `CONTROLS`, `CODE`, or `PROPERTIES` body, since those bodies hold
//! field/key/control names and trigger code where the same words are
//! legitimate identifiers rather than section headers.

use crate::cursor::Cursor;
use crate::error::{LexError, LexErrorKind};
use crate::token::{Token, TokenKind};

/// A section body whose entries may contain a downgraded reserved word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Fields,
    Keys,
    Controls,
    Code,
    Properties,
}

struct ModeFrame {
    mode: Mode,
    /// The brace depth (after consuming the section's opening `{`) at which
    /// this mode became active. The mode pops when depth falls back below it.
    depth: u32,
}

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    modes: Vec<ModeFrame>,
    brace_depth: u32,
    errors: Vec<LexError>,
}

/// Tokenizes `source`, returning every token (including comments) in order,
/// terminated by a single [`TokenKind::Eof`], plus any lexical errors found.
/// Errors do not stop tokenization: an unterminated string or comment is
/// recovered by treating the remainder of the line (or, for a block
/// comment, the remainder of the file) as the token's text.
pub fn lex(source: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer {
        cursor: Cursor::new(source),
        modes: Vec::new(),
        brace_depth: 0,
        errors: Vec::new(),
    };
    let tokens = lexer.run();
    (tokens, lexer.errors)
}

impl<'a> Lexer<'a> {
    fn run(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_at_end() {
                let line = self.cursor.line();
                let column = self.cursor.column();
                let pos = self.cursor.position() as u32;
                tokens.push(Token::new(TokenKind::Eof, "", line, column, pos, pos));
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn current_mode(&self) -> Option<Mode> {
        self.modes.last().map(|f| f.mode)
    }

    fn pop_closed_modes(&mut self) {
        while let Some(frame) = self.modes.last() {
            if self.brace_depth < frame.depth {
                self.modes.pop();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Token {
        let line = self.cursor.line();
        let column = self.cursor.column();
        let start = self.cursor.position() as u32;
        let c = self.cursor.current_char();

        let (kind, text) = match c {
            '{' => {
                self.cursor.advance();
                self.brace_depth += 1;
                (TokenKind::LBrace, "{".to_string())
            }
            '}' => {
                self.cursor.advance();
                self.brace_depth = self.brace_depth.saturating_sub(1);
                self.pop_closed_modes();
                (TokenKind::RBrace, "}".to_string())
            }
            '(' => {
                self.cursor.advance();
                (TokenKind::LParen, "(".to_string())
            }
            ')' => {
                self.cursor.advance();
                (TokenKind::RParen, ")".to_string())
            }
            '[' => {
                self.cursor.advance();
                (TokenKind::LBracket, "[".to_string())
            }
            ']' => {
                self.cursor.advance();
                (TokenKind::RBracket, "]".to_string())
            }
            ';' => {
                self.cursor.advance();
                (TokenKind::Semicolon, ";".to_string())
            }
            ',' => {
                self.cursor.advance();
                (TokenKind::Comma, ",".to_string())
            }
            '.' => {
                self.cursor.advance();
                if self.cursor.current_char() == '.' {
                    self.cursor.advance();
                    (TokenKind::DotDot, "..".to_string())
                } else {
                    (TokenKind::Dot, ".".to_string())
                }
            }
            ':' => {
                self.cursor.advance();
                if self.cursor.current_char() == '=' {
                    self.cursor.advance();
                    (TokenKind::Assign, ":=".to_string())
                } else {
                    (TokenKind::Colon, ":".to_string())
                }
            }
            '=' => {
                self.cursor.advance();
                (TokenKind::Eq, "=".to_string())
            }
            '<' => {
                self.cursor.advance();
                match self.cursor.current_char() {
                    '>' => {
                        self.cursor.advance();
                        (TokenKind::NotEq, "<>".to_string())
                    }
                    '=' => {
                        self.cursor.advance();
                        (TokenKind::LtEq, "<=".to_string())
                    }
                    _ => (TokenKind::Lt, "<".to_string()),
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.current_char() == '=' {
                    self.cursor.advance();
                    (TokenKind::GtEq, ">=".to_string())
                } else {
                    (TokenKind::Gt, ">".to_string())
                }
            }
            '+' => {
                self.cursor.advance();
                (TokenKind::Plus, "+".to_string())
            }
            '-' => {
                self.cursor.advance();
                (TokenKind::Minus, "-".to_string())
            }
            '*' => {
                self.cursor.advance();
                (TokenKind::Star, "*".to_string())
            }
            '/' => self.scan_slash(),
            '\'' => self.scan_string(),
            '"' => self.scan_quoted_identifier(),
            '@' if self.cursor.peek_char(1).is_ascii_digit() => self.scan_at_index(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_ident_start(c) => self.scan_identifier(),
            other => {
                self.cursor.advance();
                let end = self.cursor.position() as u32;
                self.errors.push(LexError::new(
                    LexErrorKind::UnexpectedCharacter,
                    format!("unexpected character '{other}'"),
                    cal_base::Span::new(start as usize, end as usize),
                ));
                (TokenKind::Identifier, other.to_string())
            }
        };

        let end = self.cursor.position() as u32;
        Token::new(kind, text, line, column, start, end)
    }

    fn scan_slash(&mut self) -> (TokenKind, String) {
        if self.cursor.peek_char(1) == '/' {
            let start = self.cursor.position();
            while !self.cursor.is_at_end() && !matches!(self.cursor.current_char(), '\n' | '\r') {
                self.cursor.advance();
            }
            return (TokenKind::LineComment, self.cursor.slice_from(start).to_string());
        }
        if self.cursor.peek_char(1) == '*' {
            return self.scan_block_comment();
        }
        self.cursor.advance();
        (TokenKind::Slash, "/".to_string())
    }

    fn scan_block_comment(&mut self) -> (TokenKind, String) {
        let start = self.cursor.position();
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        loop {
            if self.cursor.is_at_end() {
                let text = self.cursor.slice_from(start).to_string();
                self.errors.push(LexError::new(
                    LexErrorKind::UnterminatedBlockComment,
                    "unterminated block comment",
                    cal_base::Span::new(start, self.cursor.position()),
                ));
                return (TokenKind::BlockComment, text);
            }
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return (TokenKind::BlockComment, self.cursor.slice_from(start).to_string());
            }
            self.cursor.advance();
        }
    }

    fn scan_string(&mut self) -> (TokenKind, String) {
        let start = self.cursor.position();
        self.cursor.advance(); // opening '
        loop {
            if self.cursor.is_at_end() || matches!(self.cursor.current_char(), '\n' | '\r') {
                let text = self.cursor.slice_from(start).to_string();
                self.errors.push(LexError::new(
                    LexErrorKind::UnterminatedString,
                    "unterminated string literal",
                    cal_base::Span::new(start, self.cursor.position()),
                ));
                return (TokenKind::StringLit, text);
            }
            if self.cursor.current_char() == '\'' {
                if self.cursor.peek_char(1) == '\'' {
                    self.cursor.advance();
                    self.cursor.advance();
                    continue;
                }
                self.cursor.advance();
                return (TokenKind::StringLit, self.cursor.slice_from(start).to_string());
            }
            self.cursor.advance();
        }
    }

    fn scan_quoted_identifier(&mut self) -> (TokenKind, String) {
        let start = self.cursor.position();
        self.cursor.advance(); // opening "
        loop {
            if self.cursor.is_at_end() || matches!(self.cursor.current_char(), '\n' | '\r') {
                let text = self.cursor.slice_from(start).to_string();
                self.errors.push(LexError::new(
                    LexErrorKind::UnterminatedQuotedIdentifier,
                    "unterminated quoted identifier",
                    cal_base::Span::new(start, self.cursor.position()),
                ));
                return (TokenKind::QuotedIdentifier, text);
            }
            if self.cursor.current_char() == '"' {
                self.cursor.advance();
                return (TokenKind::QuotedIdentifier, self.cursor.slice_from(start).to_string());
            }
            self.cursor.advance();
        }
    }

    fn scan_at_index(&mut self) -> (TokenKind, String) {
        let start = self.cursor.position();
        self.cursor.advance(); // '@'
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        (TokenKind::AtIndex, self.cursor.slice_from(start).to_string())
    }

    /// Scans an integer, decimal, date (`MM/DD/YY[YY]`), time (`HH:MM:SS`),
    /// or a date immediately followed by a time (datetime).
    fn scan_number(&mut self) -> (TokenKind, String) {
        let start = self.cursor.position();
        self.consume_digits();

        if self.looks_like_date_continuation() {
            self.cursor.advance(); // '/'
            self.consume_digits(); // DD
            if self.cursor.current_char() == '/' && self.cursor.peek_char(1).is_ascii_digit() {
                self.cursor.advance(); // '/'
                self.consume_digits(); // YY or YYYY
            }
            let date_text = self.cursor.slice_from(start).to_string();
            if self.cursor.current_char() == ' ' && self.time_follows_at(1) {
                self.cursor.advance();
                self.consume_time_digits();
                return (TokenKind::DateTime, self.cursor.slice_from(start).to_string());
            }
            return (TokenKind::Date, date_text);
        }

        if self.cursor.current_char() == ':' && self.cursor.peek_char(1).is_ascii_digit() {
            self.consume_time_digits();
            return (TokenKind::Time, self.cursor.slice_from(start).to_string());
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            self.consume_digits();
            return (TokenKind::Decimal, self.cursor.slice_from(start).to_string());
        }

        (TokenKind::Integer, self.cursor.slice_from(start).to_string())
    }

    fn looks_like_date_continuation(&self) -> bool {
        self.cursor.current_char() == '/' && self.cursor.peek_char(1).is_ascii_digit()
    }

    fn time_follows_at(&self, offset: usize) -> bool {
        let mut digits = 0;
        let mut i = offset;
        while self.cursor.char_at(i).is_ascii_digit() {
            digits += 1;
            i += 1;
        }
        digits > 0 && self.cursor.char_at(i) == ':'
    }

    fn consume_digits(&mut self) {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
    }

    fn consume_time_digits(&mut self) {
        self.consume_digits();
        while self.cursor.current_char() == ':' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            self.consume_digits();
        }
    }

    fn scan_identifier(&mut self) -> (TokenKind, String) {
        let start = self.cursor.position();
        self.consume_ident_chars();
        let mut text = self.cursor.slice_from(start).to_string();

        // `OBJECT-PROPERTIES` is the one reserved word with a hyphen; every
        // other identifier stops before a `-` so it can be re-lexed as Minus.
        if text.eq_ignore_ascii_case("OBJECT")
            && self.cursor.current_char() == '-'
            && is_ident_start(self.cursor.peek_char(1))
        {
            let snapshot = self.cursor.snapshot();
            self.cursor.advance(); // '-'
            let word_start = self.cursor.position();
            self.consume_ident_chars();
            let combined = format!("{text}-{}", self.cursor.slice_from(word_start));
            if combined.eq_ignore_ascii_case("OBJECT-PROPERTIES") {
                text = combined;
            } else {
                self.cursor.restore(snapshot);
            }
        }

        if let Some(keyword) = TokenKind::keyword_for(&text) {
            if keyword.is_downgradable() && self.current_mode().is_some() {
                return (TokenKind::Identifier, text);
            }
            if let Some(mode) = section_mode_for(keyword) {
                self.try_enter_mode(mode);
            }
            return (keyword, text);
        }

        (TokenKind::Identifier, text)
    }

    /// If the section word is immediately followed by whitespace and `{`,
    /// its body becomes an active mode once that brace is consumed.
    fn try_enter_mode(&mut self, mode: Mode) {
        let snapshot = self.cursor.snapshot();
        self.cursor.skip_whitespace();
        if self.cursor.current_char() == '{' {
            self.cursor.restore(snapshot);
            self.modes.push(ModeFrame {
                mode,
                depth: self.brace_depth + 1,
            });
        } else {
            self.cursor.restore(snapshot);
        }
    }

    fn consume_ident_chars(&mut self) {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
    }
}

fn section_mode_for(kind: TokenKind) -> Option<Mode> {
    Some(match kind {
        TokenKind::Fields => Mode::Fields,
        TokenKind::Keys => Mode::Keys,
        TokenKind::Controls => Mode::Controls,
        TokenKind::Code => Mode::Code,
        TokenKind::Properties => Mode::Properties,
        _ => return None,
    })
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn object_header_tokenizes() {
        let k = kinds("OBJECT Table 50000 Customer");
        assert_eq!(
            k,
            vec![
                TokenKind::Object,
                TokenKind::Identifier,
                TokenKind::Integer,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn object_properties_is_one_token() {
        let (tokens, _) = lex("OBJECT-PROPERTIES");
        assert_eq!(tokens[0].kind, TokenKind::ObjectProperties);
        assert_eq!(tokens[0].text, "OBJECT-PROPERTIES");
    }

    #[test]
    fn line_comment_runs_to_end_of_line() {
        let (tokens, _) = lex("// hello\nOBJECT");
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
        assert_eq!(tokens[0].text, "// hello");
        assert_eq!(tokens[1].kind, TokenKind::Object);
    }

    #[test]
    fn unterminated_block_comment_spans_to_eof_and_errors() {
        let (tokens, errors) = lex("/* never closed");
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedBlockComment);
    }

    #[test]
    fn string_literal_with_doubled_quote_escape() {
        let (tokens, errors) = lex("'it''s'");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::StringLit);
        assert_eq!(tokens[0].text, "'it''s'");
    }

    #[test]
    fn unterminated_string_does_not_cross_lines() {
        let (tokens, errors) = lex("'oops\nOBJECT");
        assert_eq!(tokens[0].kind, TokenKind::StringLit);
        assert_eq!(tokens[0].text, "'oops");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(tokens[1].kind, TokenKind::Object);
    }

    #[test]
    fn quoted_identifier_strips_to_inner_text() {
        let (tokens, _) = lex("\"Line No.\"");
        assert_eq!(tokens[0].kind, TokenKind::QuotedIdentifier);
        assert_eq!(tokens[0].identifier_name(), "Line No.");
    }

    #[test]
    fn at_index_is_its_own_token() {
        let k = kinds("x@1000 := 1");
        assert_eq!(
            k,
            vec![
                TokenKind::Identifier,
                TokenKind::AtIndex,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn date_time_and_decimal_literals() {
        assert_eq!(kinds("01/02/24")[0], TokenKind::Date);
        assert_eq!(kinds("14:30:00")[0], TokenKind::Time);
        assert_eq!(kinds("01/02/2024 14:30:00")[0], TokenKind::DateTime);
        assert_eq!(kinds("3.14")[0], TokenKind::Decimal);
        assert_eq!(kinds("42")[0], TokenKind::Integer);
    }

    #[test]
    fn boolean_literals_are_keyword_classified() {
        let (tokens, _) = lex("TRUE FALSE");
        assert_eq!(tokens[0].kind, TokenKind::Boolean);
        assert_eq!(tokens[1].kind, TokenKind::Boolean);
    }

    #[test]
    fn fields_and_keys_are_never_downgraded_inside_code() {
        // Inside a CODE body, Fields/Keys/Controls keep their keyword kind,
        // even though Properties/Code are downgraded to identifiers there.
        let src = "CODE {\nVAR\n  Fields : Integer;\nBEGIN\nEND;\n}";
        let (tokens, _) = lex(src);
        let fields_tok = tokens.iter().find(|t| t.text == "Fields").unwrap();
        assert_eq!(fields_tok.kind, TokenKind::Fields);
    }

    #[test]
    fn code_keyword_downgrades_inside_code_body() {
        let src = "CODE {\nVAR\n  Code : Code10;\nBEGIN\nEND;\n}";
        let (tokens, _) = lex(src);
        // The first `Code` opened the section; the declaration's `Code` and
        // type name `Code10` are plain identifiers inside the body.
        let occurrences: Vec<_> = tokens.iter().filter(|t| t.text.eq_ignore_ascii_case("code")).collect();
        assert_eq!(occurrences[0].kind, TokenKind::Code);
        assert_eq!(occurrences[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn properties_downgrades_inside_fields_entry() {
        let src = "FIELDS {\n  { 1 ; ; Properties ; Text30 }\n}";
        let (tokens, _) = lex(src);
        let props: Vec<_> = tokens.iter().filter(|t| t.text.eq_ignore_ascii_case("properties")).collect();
        assert_eq!(props[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn mode_pops_when_section_brace_closes() {
        let src = "FIELDS {\n  { 1 ; ; Code ; Code10 }\n}\nCode";
        let (tokens, _) = lex(src);
        let occurrences: Vec<_> = tokens.iter().filter(|t| t.text.eq_ignore_ascii_case("code")).collect();
        // Inside FIELDS, `Code` (the field name) is downgraded; after the
        // section closes, a later bare `Code` is the section keyword again.
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].kind, TokenKind::Identifier);
        assert_eq!(occurrences[1].kind, TokenKind::Code);
    }
}
