//! Scoped symbol table built by walking the parsed AST.
//!
//! A [`Scope`] is an offset-indexed region of source owning a set of
//! [`Symbol`]s and referring to its parent by index into a flat `Vec<Scope>`
//! owned by [`SymbolTable`] — never an owning back-reference, so the tree
//! can't form a cycle (see `cal-lang`'s design notes on scope storage).
//!
//! Name lookup is case-insensitive throughout, per the language's own
//! case-insensitive identifier rules; the `Symbol`'s `name` field always
//! keeps the verbatim spelling (including a quoted field name's internal
//! whitespace) for display.

mod collector;

use std::collections::HashMap;

use cal_base::Span;

use crate::token::Token;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of declaration a [`Symbol`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymbolKind {
    Variable,
    Parameter,
    Field,
    Key,
    Procedure,
    Trigger,
    Object,
}

/// A named declaration anchored to the token that introduced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub type_name: Option<String>,
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, token: &Token) -> Self {
        Symbol {
            name: name.into(),
            kind,
            type_name: None,
            span: token.span(),
            line: token.line,
            column: token.column,
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

/// An offset-indexed lexical scope. `[start_offset, end_offset]` is
/// inclusive on both ends, matching the spec's containment invariant;
/// `parent`/`children` are indices into the owning `SymbolTable`'s flat
/// scope vector.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub start_offset: usize,
    pub end_offset: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    own_symbols: HashMap<String, Symbol>,
}

impl Scope {
    fn new(start_offset: usize, end_offset: usize, parent: Option<usize>) -> Self {
        Scope {
            start_offset,
            end_offset,
            parent,
            children: Vec::new(),
            own_symbols: HashMap::new(),
        }
    }

    fn contains(&self, offset: usize) -> bool {
        self.start_offset <= offset && offset <= self.end_offset
    }

    /// Inserts `symbol`, keyed case-insensitively. A redeclaration of the
    /// same name overwrites the earlier entry — validators, not this table,
    /// decide whether that is an error.
    fn insert(&mut self, symbol: Symbol) {
        self.own_symbols.insert(symbol.name.to_ascii_lowercase(), symbol);
    }

    fn get(&self, name: &str) -> Option<&Symbol> {
        self.own_symbols.get(&name.to_ascii_lowercase())
    }

    /// This scope's own symbols (not those of ancestors), in no particular
    /// order.
    pub fn own_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.own_symbols.values()
    }
}

/// Scope tree plus positional lookup, built once per parse from a
/// [`crate::ast::CalDocument`] and owned thereafter; queries never mutate
/// it.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable {
            scopes: vec![Scope::new(0, 0, None)],
        }
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the scope tree from `doc`, discarding whatever this table
    /// held before. `tokens` must be the same slice the AST's token indices
    /// were produced against.
    pub fn build_from_ast(&mut self, doc: &crate::ast::CalDocument, tokens: &[Token]) {
        self.scopes.clear();
        let (root_start, root_end) = match &doc.object {
            Some(object) => (
                tokens[object.start_token as usize].start_offset as usize,
                tokens[object.end_token as usize].end_offset as usize,
            ),
            None => (0, 0),
        };
        self.scopes.push(Scope::new(root_start, root_end, None));

        if let Some(object) = &doc.object {
            collector::collect_object(self, object, tokens);
        }
    }

    /// Root-scope-only containment check, per the spec's `hasSymbol`
    /// contract.
    pub fn has_symbol(&self, name: &str) -> bool {
        self.root_scope().get(name).is_some()
    }

    /// Root-scope-only lookup, per the spec's `hasSymbol` contract.
    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.root_scope().get(name)
    }

    /// All symbols owned directly by the root scope.
    pub fn get_all_symbols(&self) -> Vec<&Symbol> {
        self.root_scope().own_symbols().collect()
    }

    /// Resolves `name` starting from the deepest scope containing `offset`
    /// and walking up through parents, case-insensitively.
    pub fn get_symbol_at_offset(&self, name: &str, offset: usize) -> Option<&Symbol> {
        let mut idx = Some(self.scope_index_at_offset(offset));
        while let Some(i) = idx {
            let scope = &self.scopes[i];
            if let Some(symbol) = scope.get(name) {
                return Some(symbol);
            }
            idx = scope.parent;
        }
        None
    }

    /// The deepest scope whose range contains `offset`, or the root scope
    /// if no child matches.
    pub fn get_scope_at_offset(&self, offset: usize) -> &Scope {
        &self.scopes[self.scope_index_at_offset(offset)]
    }

    pub fn get_root_scope(&self) -> &Scope {
        self.root_scope()
    }

    /// Inserts a symbol directly into the root scope, bypassing AST
    /// traversal. Used by a host to register builtins (global variables,
    /// well-known object references) the parser itself never sees.
    pub fn define_global(&mut self, symbol: Symbol) {
        self.scopes[0].insert(symbol);
    }

    fn root_scope(&self) -> &Scope {
        &self.scopes[0]
    }

    fn scope_index_at_offset(&self, offset: usize) -> usize {
        let mut current = 0usize;
        loop {
            let next = self.scopes[current]
                .children
                .iter()
                .copied()
                .find(|&child| self.scopes[child].contains(offset));
            match next {
                Some(child) => current = child,
                None => return current,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::Parser;

    fn build(src: &str) -> (SymbolTable, Vec<Token>) {
        let (tokens, _) = lex(src);
        let mut parser = Parser::new(tokens);
        let doc = parser.parse();
        let tokens = parser.tokens().to_vec();
        let mut table = SymbolTable::new();
        table.build_from_ast(&doc, &tokens);
        (table, tokens)
    }

    #[test]
    fn empty_document_has_degenerate_root_scope() {
        let (table, _) = build("");
        let root = table.get_root_scope();
        assert_eq!(root.start_offset, 0);
        assert_eq!(root.end_offset, 0);
    }

    #[test]
    fn field_symbols_land_in_root_scope() {
        let src = r#"OBJECT Table 18 Customer {
  FIELDS {
    { 1 ; ; "Line No." ; Code20 }
    { 2 ; ; Name ; Text100 }
  }
}"#;
        let (table, _) = build(src);
        assert!(table.has_symbol("Line No."));
        assert_eq!(table.get_symbol("Line No.").unwrap().kind, SymbolKind::Field);
        assert!(table.has_symbol("name")); // case-insensitive
    }

    #[test]
    fn procedure_scope_contains_parameters_and_locals_not_root() {
        let src = r#"OBJECT Codeunit 50000 Test {
  CODE {
    PROCEDURE DoIt@1(p1 : Integer);
    VAR
      x@1000 : Integer;
    BEGIN
    END;
  }
}"#;
        let (table, _) = build(src);
        assert!(!table.has_symbol("p1"));
        assert!(!table.has_symbol("x"));
        assert!(table.has_symbol("DoIt"));

        let offset = src.find("x@1000").unwrap() + 1;
        let sym = table.get_symbol_at_offset("x", offset).unwrap();
        assert_eq!(sym.kind, SymbolKind::Variable);
        let param = table.get_symbol_at_offset("p1", offset).unwrap();
        assert_eq!(param.kind, SymbolKind::Parameter);
    }
}
