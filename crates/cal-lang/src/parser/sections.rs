//! Section parsers for `FIELDS`, `KEYS`, `CONTROLS`, `ACTIONS`, `ELEMENTS`,
//! and `CODE`.

use super::Parser;
use crate::ast::*;
use crate::error::ParseErrorKind;
use crate::token::TokenKind;

impl Parser {
    pub(super) fn parse_fields(&mut self) -> Fields {
        let start = self.current_index();
        self.advance(); // FIELDS
        self.next_significant();
        self.expect(TokenKind::LBrace, ParseErrorKind::MissingClosingBrace, "Expected { to open FIELDS");

        let mut fields = Vec::new();
        loop {
            self.next_significant();
            if self.is_eof() || self.check(TokenKind::RBrace) {
                break;
            }
            if self.check(TokenKind::LBrace) {
                fields.push(self.parse_field_entry());
            } else {
                // Unrecognized content inside FIELDS; skip one token to
                // guarantee forward progress and keep scanning.
                self.error_at("Expected { to open a field entry", ParseErrorKind::MalformedDeclaration);
                self.advance();
            }
        }
        let end = self.expect(TokenKind::RBrace, ParseErrorKind::MissingClosingBrace, "Expected } to close FIELDS");
        Fields { fields, start_token: start, end_token: end }
    }

    fn parse_field_entry(&mut self) -> Field {
        let start = self.current_index();
        self.advance(); // {

        let id = self.parse_optional_leading_int();
        self.next_significant();
        self.match_kind(TokenKind::Semicolon);
        // second segment, conventionally blank (parent field id), ignored
        self.skip_segment_until_semicolon();
        self.next_significant();
        self.match_kind(TokenKind::Semicolon);

        self.next_significant();
        let name_token = self.current_index();
        let name = self.current().identifier_name().to_string();
        self.advance();
        self.next_significant();
        self.match_kind(TokenKind::Semicolon);

        self.next_significant();
        let type_name = self.scan_raw_value_until_semicolon();
        self.next_significant();
        self.match_kind(TokenKind::Semicolon);

        let mut triggers = Vec::new();
        loop {
            self.next_significant();
            if self.is_eof() || self.check(TokenKind::RBrace) {
                break;
            }
            triggers.push(self.parse_property_entry());
        }
        let end = self.expect(TokenKind::RBrace, ParseErrorKind::MissingClosingBrace, "Expected } to close field entry");

        Field {
            id,
            name,
            name_token,
            type_name,
            triggers,
            start_token: start,
            end_token: end,
        }
    }

    fn parse_optional_leading_int(&mut self) -> Option<u32> {
        self.next_significant();
        if self.check(TokenKind::Integer) {
            let v = self.current().text.parse().ok();
            self.advance();
            v
        } else {
            None
        }
    }

    fn skip_segment_until_semicolon(&mut self) {
        loop {
            self.next_significant();
            if self.is_eof() || matches!(self.current().kind, TokenKind::Semicolon | TokenKind::RBrace) {
                break;
            }
            self.advance();
        }
    }

    pub(super) fn parse_keys(&mut self) -> Keys {
        let start = self.current_index();
        self.advance(); // KEYS
        self.next_significant();
        self.expect(TokenKind::LBrace, ParseErrorKind::MissingClosingBrace, "Expected { to open KEYS");

        let mut keys = Vec::new();
        loop {
            self.next_significant();
            if self.is_eof() || self.check(TokenKind::RBrace) {
                break;
            }
            if self.check(TokenKind::LBrace) {
                keys.push(self.parse_key_entry());
            } else {
                self.error_at("Expected { to open a key entry", ParseErrorKind::MalformedDeclaration);
                self.advance();
            }
        }
        let end = self.expect(TokenKind::RBrace, ParseErrorKind::MissingClosingBrace, "Expected } to close KEYS");
        Keys { keys, start_token: start, end_token: end }
    }

    fn parse_key_entry(&mut self) -> Key {
        let start = self.current_index();
        self.advance(); // {

        let field_list_text = self.scan_raw_value_until_semicolon();
        let field_names = field_list_text
            .split(',')
            .map(|s| s.trim().trim_matches('"').to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self.next_significant();
        self.match_kind(TokenKind::Semicolon);

        let mut raw_properties = Vec::new();
        loop {
            self.next_significant();
            if self.is_eof() || self.check(TokenKind::RBrace) {
                break;
            }
            raw_properties.push(self.scan_raw_value_until_semicolon());
            self.next_significant();
            self.match_kind(TokenKind::Semicolon);
        }
        let end = self.expect(TokenKind::RBrace, ParseErrorKind::MissingClosingBrace, "Expected } to close key entry");

        Key { field_names, raw_properties, start_token: start, end_token: end }
    }

    pub(super) fn parse_controls(&mut self) -> Controls {
        let (items, start, end) = self.parse_item_section();
        Controls { items, start_token: start, end_token: end }
    }

    pub(super) fn parse_actions(&mut self) -> Actions {
        let (items, start, end) = self.parse_item_section();
        Actions { items, start_token: start, end_token: end }
    }

    pub(super) fn parse_elements(&mut self) -> Elements {
        let (items, start, end) = self.parse_item_section();
        Elements { items, start_token: start, end_token: end }
    }

    fn parse_item_section(&mut self) -> (Vec<SectionItem>, TokenIndex, TokenIndex) {
        let start = self.current_index();
        self.advance(); // section keyword
        self.next_significant();
        self.expect(TokenKind::LBrace, ParseErrorKind::MissingClosingBrace, "Expected { to open section");

        let mut items = Vec::new();
        loop {
            self.next_significant();
            if self.is_eof() || self.check(TokenKind::RBrace) {
                break;
            }
            if self.check(TokenKind::LBrace) {
                items.push(self.parse_section_item());
            } else {
                self.error_at("Expected { to open a section entry", ParseErrorKind::MalformedDeclaration);
                self.advance();
            }
        }
        let end = self.expect(TokenKind::RBrace, ParseErrorKind::MissingClosingBrace, "Expected } to close section");
        (items, start, end)
    }

    /// Parses one brace-delimited entry shared by `CONTROLS`, `ACTIONS`,
    /// and `ELEMENTS`: semicolon-separated segments, any of which may be a
    /// `name=trigger` assignment, interspersed with nested child entries.
    fn parse_section_item(&mut self) -> SectionItem {
        let start = self.current_index();
        self.advance(); // {

        let id = self.parse_optional_leading_int();
        self.next_significant();
        self.match_kind(TokenKind::Semicolon);

        let mut fields = Vec::new();
        let mut triggers = Vec::new();
        let mut children = Vec::new();

        loop {
            self.next_significant();
            match self.current().kind {
                TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::LBrace => {
                    children.push(self.parse_section_item());
                }
                _ => {
                    if self.looks_like_trigger_assignment() {
                        triggers.push(self.parse_property_entry());
                    } else {
                        let value = self.scan_raw_value_until_semicolon();
                        if !value.is_empty() {
                            fields.push(value);
                        }
                        self.next_significant();
                        self.match_kind(TokenKind::Semicolon);
                    }
                }
            }
        }
        let end = self.expect(TokenKind::RBrace, ParseErrorKind::MissingClosingBrace, "Expected } to close entry");

        SectionItem { id, fields, triggers, children, start_token: start, end_token: end }
    }

    /// Peeks for `Identifier = (VAR|BEGIN)`, the shape of a trigger
    /// assignment, without consuming anything.
    fn looks_like_trigger_assignment(&self) -> bool {
        matches!(self.current().kind, TokenKind::Identifier)
            && self.peek_kind(1) == TokenKind::Eq
            && matches!(self.peek_kind(2), TokenKind::Var | TokenKind::Begin)
    }

    pub(super) fn parse_code(&mut self) -> Code {
        let start = self.current_index();
        self.advance(); // CODE
        self.next_significant();
        self.expect(TokenKind::LBrace, ParseErrorKind::MissingClosingBrace, "Expected { to open CODE");

        let mut variables = Vec::new();
        if self.check(TokenKind::Var) {
            self.advance();
            variables = self.parse_var_entries();
        }

        let mut procedures = Vec::new();
        loop {
            self.next_significant();
            if self.check(TokenKind::Procedure) {
                procedures.push(self.parse_procedure());
            } else {
                break;
            }
        }

        let object_trigger = if self.check(TokenKind::Begin) {
            self.advance();
            Some(self.parse_statement_list_until_end())
        } else {
            None
        };
        if object_trigger.is_some() {
            self.expect(TokenKind::End, ParseErrorKind::MissingClosingBrace, "Expected END to close object trigger");
            self.next_significant();
            self.match_kind(TokenKind::Dot);
        }

        self.next_significant();
        let end = self.expect(TokenKind::RBrace, ParseErrorKind::MissingClosingBrace, "Expected } to close CODE");

        Code { variables, procedures, object_trigger, start_token: start, end_token: end }
    }
}
