//! Token types for the C/AL lexer and parser.
//!
//! This module defines the closed vocabulary of C/AL at the token level:
//! literals, identifiers (plain and quoted), operators and punctuation, and
//! every reserved word. Comments are emitted as tokens and retained rather
//! than discarded, since editor features (folding, hover) want them.
//!
//! ## Context-sensitive downgrading
//!
//! Eleven reserved words behave as plain identifiers inside field-name,
//! key-name, control-name, and code-block contexts. See [`crate::lexer`] for
//! the mode stack that drives this.

use cal_base::Span;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The closed set of token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    // Literals
    Integer,
    Decimal,
    StringLit,
    Date,
    Time,
    DateTime,
    Boolean,

    // Identifiers
    Identifier,
    QuotedIdentifier,

    // Index suffix: `@1000`
    AtIndex,

    // Comments (retained, not discarded)
    LineComment,
    BlockComment,

    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Comma,
    Dot,
    DotDot,

    // Operators
    Assign, // :=
    Eq,     // =
    NotEq,  // <>
    Lt,
    Gt,
    LtEq,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,

    // Reserved words: object and section structure
    Object,
    ObjectProperties,
    Properties,
    Fields,
    Keys,
    Controls,
    Code,
    FieldGroups,
    MenuNodes,
    Actions,
    DataItems,
    Dataset,
    RequestPage,
    RequestForm,
    Labels,
    Elements,

    // Reserved words: declarations and procedures
    Var,
    Procedure,
    Begin,
    End,

    // Reserved words: statements
    If,
    Then,
    Else,
    Case,
    Of,
    With,
    Do,
    While,
    Repeat,
    Until,
    For,
    To,
    DownTo,
    Exit,

    // Reserved words: operators
    Not,
    And,
    Or,
    In,
    Div,
    Mod,

    Eof,
}

impl TokenKind {
    /// The 11 reserved words the lexer downgrades to `Identifier` inside
    /// field-name, key-name, control-name, and code-block contexts.
    pub const DOWNGRADABLE: &'static [TokenKind] = &[
        TokenKind::Properties,
        TokenKind::FieldGroups,
        TokenKind::Code,
        TokenKind::MenuNodes,
        TokenKind::Actions,
        TokenKind::DataItems,
        TokenKind::Dataset,
        TokenKind::RequestPage,
        TokenKind::Labels,
        TokenKind::Elements,
        TokenKind::RequestForm,
    ];

    /// The 3 section keywords that are never downgraded by the lexer, but
    /// are still recognized by the parser for recovery and synchronization.
    pub const NEVER_DOWNGRADED: &'static [TokenKind] = &[
        TokenKind::Fields,
        TokenKind::Keys,
        TokenKind::Controls,
    ];

    /// The 14-member recovery/synchronization set: the 11 downgradable
    /// section words plus the 3 never-downgraded ones. `OBJECT-PROPERTIES`
    /// is deliberately excluded — it is recognized only as the object's
    /// leading section, not as a recovery sync point.
    pub fn is_section_sync_token(self) -> bool {
        Self::DOWNGRADABLE.contains(&self) || Self::NEVER_DOWNGRADED.contains(&self)
    }

    /// Reserved words that look up case-insensitively to a fixed keyword,
    /// used by the lexer to classify identifiers.
    pub fn keyword_for(word: &str) -> Option<TokenKind> {
        let upper = word.to_ascii_uppercase();
        Some(match upper.as_str() {
            "OBJECT" => TokenKind::Object,
            "OBJECT-PROPERTIES" => TokenKind::ObjectProperties,
            "PROPERTIES" => TokenKind::Properties,
            "FIELDS" => TokenKind::Fields,
            "KEYS" => TokenKind::Keys,
            "CONTROLS" => TokenKind::Controls,
            "CODE" => TokenKind::Code,
            "FIELDGROUPS" => TokenKind::FieldGroups,
            "MENUNODES" => TokenKind::MenuNodes,
            "ACTIONS" => TokenKind::Actions,
            "DATAITEMS" => TokenKind::DataItems,
            "DATASET" => TokenKind::Dataset,
            "REQUESTPAGE" => TokenKind::RequestPage,
            "REQUESTFORM" => TokenKind::RequestForm,
            "LABELS" => TokenKind::Labels,
            "ELEMENTS" => TokenKind::Elements,
            "VAR" => TokenKind::Var,
            "PROCEDURE" => TokenKind::Procedure,
            "BEGIN" => TokenKind::Begin,
            "END" => TokenKind::End,
            "IF" => TokenKind::If,
            "THEN" => TokenKind::Then,
            "ELSE" => TokenKind::Else,
            "CASE" => TokenKind::Case,
            "OF" => TokenKind::Of,
            "WITH" => TokenKind::With,
            "DO" => TokenKind::Do,
            "WHILE" => TokenKind::While,
            "REPEAT" => TokenKind::Repeat,
            "UNTIL" => TokenKind::Until,
            "FOR" => TokenKind::For,
            "TO" => TokenKind::To,
            "DOWNTO" => TokenKind::DownTo,
            "EXIT" => TokenKind::Exit,
            "NOT" => TokenKind::Not,
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "IN" => TokenKind::In,
            "DIV" => TokenKind::Div,
            "MOD" => TokenKind::Mod,
            "TRUE" | "FALSE" => TokenKind::Boolean,
            _ => return None,
        })
    }

    /// True for reserved words that may be downgraded to `Identifier` when
    /// the lexer's context stack says so.
    pub fn is_downgradable(self) -> bool {
        Self::DOWNGRADABLE.contains(&self)
    }
}

/// A single lexical token.
///
/// `line` and `column` are 1-based. `end_offset` is the exclusive byte end.
/// `text` preserves the original spelling, including surrounding quotes for
/// [`TokenKind::QuotedIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
    pub start_offset: u32,
    pub end_offset: u32,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        line: u32,
        column: u32,
        start_offset: u32,
        end_offset: u32,
    ) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
            start_offset,
            end_offset,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_offset as usize, self.end_offset as usize)
    }

    /// The symbol-table name for this token, with quotes stripped for
    /// [`TokenKind::QuotedIdentifier`] but internal whitespace preserved
    /// verbatim.
    pub fn identifier_name(&self) -> &str {
        match self.kind {
            TokenKind::QuotedIdentifier => {
                let t = self.text.as_str();
                t.strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .unwrap_or(t)
            }
            _ => self.text.as_str(),
        }
    }
}

/// Case-insensitive name equality, used throughout symbol lookup and
/// reserved-word classification.
pub fn names_eq_ci(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_insensitive() {
        assert_eq!(TokenKind::keyword_for("object"), Some(TokenKind::Object));
        assert_eq!(TokenKind::keyword_for("Object"), Some(TokenKind::Object));
        assert_eq!(TokenKind::keyword_for("OBJECT"), Some(TokenKind::Object));
    }

    #[test]
    fn downgradable_set_has_eleven_members() {
        assert_eq!(TokenKind::DOWNGRADABLE.len(), 11);
    }

    #[test]
    fn never_downgraded_set_has_three_members() {
        assert_eq!(TokenKind::NEVER_DOWNGRADED.len(), 3);
    }

    #[test]
    fn section_sync_set_has_fourteen_members() {
        let count = [
            TokenKind::Properties,
            TokenKind::FieldGroups,
            TokenKind::Code,
            TokenKind::MenuNodes,
            TokenKind::Actions,
            TokenKind::DataItems,
            TokenKind::Dataset,
            TokenKind::RequestPage,
            TokenKind::Labels,
            TokenKind::Elements,
            TokenKind::RequestForm,
            TokenKind::Fields,
            TokenKind::Keys,
            TokenKind::Controls,
        ]
        .iter()
        .filter(|k| k.is_section_sync_token())
        .count();
        assert_eq!(count, 14);
        assert!(!TokenKind::ObjectProperties.is_section_sync_token());
    }

    #[test]
    fn quoted_identifier_name_strips_quotes_preserves_inner_whitespace() {
        let tok = Token::new(TokenKind::QuotedIdentifier, "\"Line No.\"", 1, 1, 0, 10);
        assert_eq!(tok.identifier_name(), "Line No.");
    }

    #[test]
    fn names_eq_ci_ignores_case() {
        assert!(names_eq_ci("myVar", "MYVAR"));
        assert!(!names_eq_ci("myVar", "otherVar"));
    }
}
