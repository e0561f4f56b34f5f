//! Semantic-token production: raw per-token classification followed by an
//! AST-driven refinement pass that promotes declaration sites to richer
//! types. Output is the LSP delta-encoded `SemanticToken` stream; see
//! `crate::line_index` for the byte-offset conversions diagnostics use —
//! this module works from each token's own `line`/`column`/`text` and
//! never needs the raw source.

use std::collections::HashMap;

use lsp_types::{SemanticToken, SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};

use crate::ast::{CalDocument, Object, TokenIndex};
use crate::token::{Token, TokenKind};

pub const TOKEN_TYPES: &[SemanticTokenType] = &[
    SemanticTokenType::KEYWORD,   // 0
    SemanticTokenType::VARIABLE,  // 1
    SemanticTokenType::STRING,    // 2
    SemanticTokenType::NUMBER,    // 3
    SemanticTokenType::COMMENT,   // 4
    SemanticTokenType::TYPE,      // 5
    SemanticTokenType::FUNCTION,  // 6
    SemanticTokenType::PARAMETER, // 7
    SemanticTokenType::PROPERTY,  // 8
    SemanticTokenType::OPERATOR,  // 9
];

const KEYWORD: u32 = 0;
const VARIABLE: u32 = 1;
const STRING: u32 = 2;
const NUMBER: u32 = 3;
const COMMENT: u32 = 4;
const FUNCTION: u32 = 6;
const PARAMETER: u32 = 7;
const PROPERTY: u32 = 8;

pub const TOKEN_MODIFIERS: &[SemanticTokenModifier] = &[
    SemanticTokenModifier::DECLARATION, // 0
    SemanticTokenModifier::DEFINITION,  // 1
    SemanticTokenModifier::READONLY,    // 2
    SemanticTokenModifier::STATIC,      // 3
];

const DECLARATION: u32 = 1 << 0;

pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TOKEN_TYPES.to_vec(),
        token_modifiers: TOKEN_MODIFIERS.to_vec(),
    }
}

/// Builds the delta-encoded semantic token stream for `tokens`, refined
/// against `doc`. Tokens whose kind has no visible category (punctuation,
/// operators, the `@index` suffix, `EOF`) are skipped entirely — they
/// never occupy a slot in the emitted sequence.
pub fn build(tokens: &[Token], doc: &CalDocument) -> Vec<SemanticToken> {
    let mut classified: Vec<Option<(u32, u32)>> = tokens.iter().map(|t| classify_raw(t.kind)).collect();

    let overrides = collect_overrides(doc);
    for (idx, value) in overrides {
        if let Some(slot) = classified.get_mut(idx as usize) {
            *slot = Some(value);
        }
    }

    let mut result = Vec::new();
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for (token, slot) in tokens.iter().zip(classified.iter()) {
        let (token_type, modifiers) = match slot {
            Some(v) => *v,
            None => continue,
        };

        for (line, column, length) in line_segments(token) {
            if length == 0 {
                continue;
            }
            let delta_line = line - prev_line;
            let delta_start = if delta_line == 0 { column - prev_start } else { column };

            result.push(SemanticToken {
                delta_line,
                delta_start,
                length,
                token_type,
                token_modifiers_bitset: modifiers,
            });

            prev_line = line;
            prev_start = column;
        }
    }

    result
}

/// A token's text split into per-line `(line, column, utf16_length)`
/// segments, 0-based, so that a multi-line block comment becomes one
/// semantic token per physical line rather than violating the LSP
/// single-line-per-token rule.
fn line_segments(token: &Token) -> Vec<(u32, u32, u32)> {
    let mut segments = Vec::new();
    let mut line = token.line - 1;
    let mut column = token.column - 1;

    for (i, part) in token.text.split('\n').enumerate() {
        if i > 0 {
            line += 1;
            column = 0;
        }
        let part = part.strip_suffix('\r').unwrap_or(part);
        let length = part.encode_utf16().count() as u32;
        segments.push((line, column, length));
    }

    segments
}

fn classify_raw(kind: TokenKind) -> Option<(u32, u32)> {
    use TokenKind::*;
    let type_idx = match kind {
        Integer | Decimal | Date | Time | DateTime => NUMBER,
        StringLit => STRING,
        Identifier | QuotedIdentifier => VARIABLE,
        LineComment | BlockComment => COMMENT,
        Boolean => KEYWORD,
        Object | ObjectProperties | Properties | Fields | Keys | Controls | Code | FieldGroups
        | MenuNodes | Actions | DataItems | Dataset | RequestPage | RequestForm | Labels
        | Elements | Var | Procedure | Begin | End | If | Then | Else | Case | Of | With | Do
        | While | Repeat | Until | For | To | DownTo | Exit | Not | And | Or | In | Div | Mod => {
            KEYWORD
        }
        AtIndex | LBrace | RBrace | LParen | RParen | LBracket | RBracket | Semicolon | Colon
        | Comma | Dot | DotDot | Assign | Eq | NotEq | Lt | Gt | LtEq | GtEq | Plus | Minus
        | Star | Slash | Eof => return None,
    };
    Some((type_idx, 0))
}

/// Promotes declaration-site identifier tokens to richer types: the
/// object's own name, procedure names, parameters, and field names.
/// Trigger-local variable declarations are left as plain `variable` —
/// nothing in the base table or the refinement list calls them out.
fn collect_overrides(doc: &CalDocument) -> HashMap<TokenIndex, (u32, u32)> {
    let mut overrides = HashMap::new();
    if let Some(object) = &doc.object {
        collect_object_overrides(object, &mut overrides);
    }
    overrides
}

fn collect_object_overrides(object: &Object, overrides: &mut HashMap<TokenIndex, (u32, u32)>) {
    overrides.insert(object.name_token, (VARIABLE, DECLARATION));

    if let Some(fields) = &object.fields {
        for field in &fields.fields {
            overrides.insert(field.name_token, (PROPERTY, DECLARATION));
        }
    }

    if let Some(code) = &object.code {
        for procedure in &code.procedures {
            overrides.insert(procedure.name_token, (FUNCTION, DECLARATION));
            for param in &procedure.parameters {
                overrides.insert(param.name_token, (PARAMETER, DECLARATION));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::Parser;

    fn build_tokens(src: &str) -> (Vec<Token>, CalDocument) {
        let (tokens, _) = lex(src);
        let mut parser = Parser::new(tokens);
        let doc = parser.parse();
        (parser.tokens().to_vec(), doc)
    }

    #[test]
    fn legend_includes_required_types_and_modifiers() {
        let legend = legend();
        assert!(legend.token_types.contains(&SemanticTokenType::KEYWORD));
        assert!(legend.token_types.contains(&SemanticTokenType::VARIABLE));
        assert!(legend.token_types.contains(&SemanticTokenType::STRING));
        assert!(legend.token_types.contains(&SemanticTokenType::NUMBER));
        assert!(legend.token_types.contains(&SemanticTokenType::COMMENT));
        assert!(legend.token_types.contains(&SemanticTokenType::TYPE));
        assert!(legend.token_types.contains(&SemanticTokenType::FUNCTION));
        assert!(legend.token_types.contains(&SemanticTokenType::PARAMETER));
        assert!(legend.token_types.contains(&SemanticTokenType::PROPERTY));
        assert!(legend.token_types.contains(&SemanticTokenType::OPERATOR));
        assert!(legend.token_modifiers.contains(&SemanticTokenModifier::DECLARATION));
        assert!(legend.token_modifiers.contains(&SemanticTokenModifier::DEFINITION));
        assert!(legend.token_modifiers.contains(&SemanticTokenModifier::READONLY));
        assert!(legend.token_modifiers.contains(&SemanticTokenModifier::STATIC));
    }

    #[test]
    fn punctuation_is_not_emitted() {
        let (tokens, doc) = build_tokens("OBJECT Table 18 Customer { }");
        let emitted = build(&tokens, &doc);
        // LBrace/RBrace contribute no entries; count should be far fewer
        // than the raw token count.
        assert!(emitted.len() < tokens.len());
    }

    #[test]
    fn object_name_promoted_to_variable_declaration() {
        let (tokens, doc) = build_tokens("OBJECT Table 18 Customer { }");
        let emitted = build(&tokens, &doc);
        let declared = emitted.iter().find(|t| t.token_modifiers_bitset & DECLARATION != 0);
        assert!(declared.is_some());
        assert_eq!(declared.unwrap().token_type, VARIABLE);
    }

    #[test]
    fn procedure_and_parameter_promoted() {
        let src = r#"OBJECT Codeunit 50000 Test {
  CODE {
    PROCEDURE DoIt@1(p1 : Integer);
    BEGIN
    END;
  }
}"#;
        let (tokens, doc) = build_tokens(src);
        let emitted = build(&tokens, &doc);
        assert!(emitted.iter().any(|t| t.token_type == FUNCTION && t.token_modifiers_bitset & DECLARATION != 0));
        assert!(emitted.iter().any(|t| t.token_type == PARAMETER && t.token_modifiers_bitset & DECLARATION != 0));
    }

    #[test]
    fn field_name_promoted_to_property() {
        let src = r#"OBJECT Table 18 Customer {
  FIELDS {
    { 1 ; ; Name ; Text100 }
  }
}"#;
        let (tokens, doc) = build_tokens(src);
        let emitted = build(&tokens, &doc);
        assert!(emitted.iter().any(|t| t.token_type == PROPERTY && t.token_modifiers_bitset & DECLARATION != 0));
    }

    #[test]
    fn delta_encoding_resets_column_on_new_line() {
        let (tokens, doc) = build_tokens("OBJECT Table 18 Customer\n{ }");
        let emitted = build(&tokens, &doc);
        assert!(emitted.iter().any(|t| t.delta_line > 0));
    }

    #[test]
    fn deterministic_for_identical_input() {
        let src = "OBJECT Table 18 Customer { FIELDS { { 1 ; ; Name ; Text100 } } }";
        let (tokens_a, doc_a) = build_tokens(src);
        let (tokens_b, doc_b) = build_tokens(src);
        assert_eq!(build(&tokens_a, &doc_a), build(&tokens_b, &doc_b));
    }
}
