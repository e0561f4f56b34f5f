//! Recursive-descent parser with bounded local error recovery.
//!
//! A single `pos` cursor walks the token stream. Each `parse_x` either
//! consumes the `x` it recognizes, returning a node whose `end_token` is
//! the last consumed token, or synthesizes a partial node and records a
//! `ParseError`. The parser never panics and always returns a
//! `CalDocument`, even for empty or deeply malformed input.

mod expr;
mod sections;
mod stmt;

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, "", 1, 1, 0, 0));
        }
        Parser {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parses the whole token stream. Never panics; a document with no
    /// `OBJECT` header parses to `CalDocument { object: None }`.
    pub fn parse(&mut self) -> CalDocument {
        self.skip_trivia();
        if self.is_eof() {
            return CalDocument { object: None };
        }
        if self.check(TokenKind::Object) {
            CalDocument {
                object: Some(self.parse_object()),
            }
        } else {
            // No recognizable object header: record nothing structural,
            // leave the document empty. Downstream tooling treats this the
            // same as an empty file.
            CalDocument { object: None }
        }
    }

    /// Errors recorded during the last `parse()` call. Non-destructive:
    /// calling this more than once returns the same list.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    // ---- cursor primitives ----

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_index(&self) -> TokenIndex {
        self.pos.min(self.tokens.len() - 1) as TokenIndex
    }

    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn is_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consumes and returns the index of the current token, unless already
    /// at `Eof` (the `Eof` sentinel is never consumed, so callers can
    /// always test `is_eof()` to terminate a loop).
    fn advance(&mut self) -> TokenIndex {
        let idx = self.current_index();
        if !self.is_eof() {
            self.pos += 1;
        }
        idx
    }

    fn match_kind(&mut self, kind: TokenKind) -> Option<TokenIndex> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Skips comment tokens. Comments are retained in the token stream for
    /// semantic-token purposes but carry no grammatical meaning.
    fn skip_trivia(&mut self) {
        while matches!(self.current().kind, TokenKind::LineComment | TokenKind::BlockComment) {
            self.advance();
        }
    }

    fn next_significant(&mut self) {
        self.skip_trivia();
    }

    /// Consumes `kind` if present; otherwise records a `ParseError` at the
    /// current token and does not consume. Returns the index of whatever
    /// token was at the cursor (consumed or not).
    fn expect(&mut self, kind: TokenKind, err_kind: ParseErrorKind, message: impl Into<String>) -> TokenIndex {
        self.next_significant();
        if self.check(kind) {
            self.advance()
        } else {
            let idx = self.current_index();
            self.errors.push(ParseError::new(message, err_kind, self.current()));
            idx
        }
    }

    fn error_at(&mut self, message: impl Into<String>, kind: ParseErrorKind) {
        let tok = self.current().clone();
        self.errors.push(ParseError::new(message, kind, &tok));
    }

    /// Consumes the opening `{` already confirmed present, then advances
    /// tracking a brace counter until it returns to zero, discarding
    /// everything in between. Used for the six sections with no dedicated
    /// parser plus `FieldGroups`.
    fn skip_balanced_braces(&mut self) -> TokenIndex {
        self.next_significant();
        self.expect(TokenKind::LBrace, ParseErrorKind::MissingClosingBrace, "Expected { to open section");
        let mut depth = 1u32;
        let mut last = self.current_index();
        while depth > 0 && !self.is_eof() {
            match self.current().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            last = self.advance();
            self.skip_trivia();
        }
        last
    }

    fn parse_object(&mut self) -> Object {
        let start = self.advance(); // OBJECT

        let kind_token = self.current().clone();
        let object_kind = ObjectKind::from_name(kind_token.identifier_name());
        if object_kind.is_none() {
            self.error_at("Expected object kind after OBJECT", ParseErrorKind::MalformedObjectHeader);
        }
        self.advance();

        let id_text = self.current().text.clone();
        let object_id: u32 = id_text.parse().unwrap_or_else(|_| {
            self.errors.push(ParseError::new(
                "Expected a numeric object id",
                ParseErrorKind::MalformedObjectHeader,
                self.current(),
            ));
            0
        });
        self.advance();

        let name_token_idx = self.current_index();
        let name_token = self.current().clone();
        let object_name = name_token.identifier_name().to_string();
        self.advance();

        let mut object = Object {
            object_kind: object_kind.unwrap_or(ObjectKind::Table),
            object_id,
            object_name,
            name_token: name_token_idx,
            object_properties: None,
            properties: None,
            fields: None,
            keys: None,
            controls: None,
            actions: None,
            elements: None,
            code: None,
            skipped_sections: Vec::new(),
            start_token: start,
            end_token: start,
        };

        self.next_significant();
        self.expect(TokenKind::LBrace, ParseErrorKind::MalformedObjectHeader, "Expected { to open object body");

        self.parse_object_sections(&mut object);

        self.next_significant();
        let end = self.expect(TokenKind::RBrace, ParseErrorKind::MissingClosingBrace, "Expected } to close object body");
        object.end_token = end;
        object
    }

    /// Consumes sections in any order until the object's closing `}`. Must
    /// continue past every recognized section, including skipped ones, so
    /// later sections (crucially `CODE`) still get parsed.
    fn parse_object_sections(&mut self, object: &mut Object) {
        loop {
            self.next_significant();
            if self.is_eof() || self.check(TokenKind::RBrace) {
                return;
            }
            let kind = self.current().kind;
            match kind {
                TokenKind::ObjectProperties => {
                    let (entries, start, end) = self.parse_property_list();
                    object.object_properties = Some(ObjectProperties { entries, start_token: start, end_token: end });
                }
                TokenKind::Properties => {
                    let (entries, start, end) = self.parse_property_list();
                    object.properties = Some(Properties { entries, start_token: start, end_token: end });
                }
                TokenKind::Fields => {
                    object.fields = Some(self.parse_fields());
                }
                TokenKind::Keys => {
                    object.keys = Some(self.parse_keys());
                }
                TokenKind::Controls => {
                    object.controls = Some(self.parse_controls());
                }
                TokenKind::Actions => {
                    object.actions = Some(self.parse_actions());
                }
                TokenKind::Elements => {
                    object.elements = Some(self.parse_elements());
                }
                TokenKind::Code => {
                    object.code = Some(self.parse_code());
                }
                TokenKind::MenuNodes
                | TokenKind::DataItems
                | TokenKind::Dataset
                | TokenKind::RequestPage
                | TokenKind::Labels
                | TokenKind::RequestForm
                | TokenKind::FieldGroups => {
                    let start = self.current_index();
                    self.advance();
                    let end = self.skip_balanced_braces();
                    object.skipped_sections.push(SkippedSection { kind, start_token: start, end_token: end });
                }
                _ => {
                    self.error_at(
                        format!("Unrecognized section header '{}'", self.current().text),
                        ParseErrorKind::UnknownSection,
                    );
                    // Forward progress: skip to the next recognized section
                    // header, the object's closing brace, or EOF.
                    while !self.is_eof() && !self.check(TokenKind::RBrace) && !self.current().kind.is_section_sync_token()
                    {
                        self.advance();
                        self.skip_trivia();
                    }
                }
            }
        }
    }

    // ---- shared helpers used by sections/stmt/expr submodules ----

    /// Parses a brace-delimited `PROPERTIES`-shaped list: `name = value;`
    /// entries, where `value` is either a trigger body (when it starts with
    /// `VAR` or `BEGIN`) or an opaque run of tokens up to the next
    /// top-level `;`. Shared by `PROPERTIES`, `OBJECT-PROPERTIES`, and any
    /// field's trailing property list.
    fn parse_property_list(&mut self) -> (Vec<PropertyEntry>, TokenIndex, TokenIndex) {
        let section_start = self.current_index();
        self.advance(); // section keyword
        self.next_significant();
        self.expect(TokenKind::LBrace, ParseErrorKind::MissingClosingBrace, "Expected { to open section");

        let mut entries = Vec::new();
        loop {
            self.next_significant();
            if self.is_eof() || self.check(TokenKind::RBrace) {
                break;
            }
            entries.push(self.parse_property_entry());
        }
        let end = self.expect(TokenKind::RBrace, ParseErrorKind::MissingClosingBrace, "Expected } to close section");
        (entries, section_start, end)
    }

    fn parse_property_entry(&mut self) -> PropertyEntry {
        let start = self.current_index();
        let name_token = start;
        let name = self.current().identifier_name().to_string();
        self.advance();

        self.next_significant();
        self.expect(TokenKind::Eq, ParseErrorKind::MalformedDeclaration, "Expected = in property assignment");

        self.next_significant();
        let (trigger, raw_value, value_end) = if self.check(TokenKind::Var) || self.check(TokenKind::Begin) {
            let body = self.parse_trigger_body();
            let end = body.end_token;
            (Some(body), None, end)
        } else {
            let before = self.current_index();
            let raw = self.scan_raw_value_until_semicolon();
            let after = self.current_index();
            let end = if after > before { after - 1 } else { before };
            (None, Some(raw), end)
        };

        self.next_significant();
        let end = self.match_kind(TokenKind::Semicolon).unwrap_or(value_end);

        PropertyEntry {
            name,
            name_token,
            trigger,
            raw_value,
            start_token: start,
            end_token: end,
        }
    }

    /// Scans tokens, joining their text with single spaces, until `stop`
    /// matches the current token at nesting depth zero (braces/parens/
    /// brackets encountered along the way are tracked so a stop token
    /// nested inside them doesn't end the scan early). Does not consume
    /// the stop token.
    fn scan_raw_tokens_until(&mut self, stop: impl Fn(TokenKind) -> bool) -> String {
        let mut parts = Vec::new();
        let mut depth = 0i32;
        loop {
            self.next_significant();
            if self.is_eof() {
                break;
            }
            let kind = self.current().kind;
            if depth == 0 && stop(kind) {
                break;
            }
            match kind {
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => depth -= 1,
                _ => {}
            }
            parts.push(self.current().text.clone());
            self.advance();
        }
        parts.join(" ")
    }

    /// Scans an opaque (non-trigger) property or section-item value up to
    /// the next top-level `;`.
    fn scan_raw_value_until_semicolon(&mut self) -> String {
        self.scan_raw_tokens_until(|k| matches!(k, TokenKind::Semicolon | TokenKind::RBrace))
    }

    /// Parses `[VAR decl...] BEGIN stmt* END` as used by property and
    /// field triggers.
    fn parse_trigger_body(&mut self) -> TriggerBody {
        let start = self.current_index();
        let local_vars = if self.check(TokenKind::Var) {
            self.advance();
            self.parse_var_entries()
        } else {
            Vec::new()
        };

        self.next_significant();
        self.expect(TokenKind::Begin, ParseErrorKind::MalformedDeclaration, "Expected BEGIN in trigger body");
        let body = self.parse_statement_list_until_end();
        let end = self.expect(TokenKind::End, ParseErrorKind::MissingClosingBrace, "Expected END to close trigger body");

        TriggerBody {
            local_vars,
            body,
            start_token: start,
            end_token: end,
        }
    }
}
