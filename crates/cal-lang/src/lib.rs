//! # cal-lang
//!
//! Analysis front-end for C/AL, the pre-AL Microsoft Dynamics NAV
//! programming language: a lexer, a recursive-descent parser with error
//! recovery, a scoped symbol table, and a semantic-token provider. This is
//! the core an LSP server builds on — it does not speak JSON-RPC, manage
//! document lifecycles, or validate anything itself; it turns source text
//! into a tree, a scope table, and a highlighting stream, and otherwise
//! stays out of the way.
//!
//! ## Quick Start
//!
//! ```rust
//! use cal_lang::lexer::lex;
//! use cal_lang::parser::Parser;
//! use cal_lang::symbols::SymbolTable;
//!
//! let source = r#"OBJECT Table 18 Customer {
//!   FIELDS {
//!     { 1 ; ; Name ; Text100 }
//!   }
//! }"#;
//!
//! let (tokens, _lex_errors) = lex(source);
//! let mut parser = Parser::new(tokens);
//! let doc = parser.parse();
//! assert!(parser.errors().is_empty());
//!
//! let tokens = parser.tokens().to_vec();
//! let mut symbols = SymbolTable::new();
//! symbols.build_from_ast(&doc, &tokens);
//! assert!(symbols.has_symbol("Name"));
//! ```
//!
//! ## Architecture
//!
//! The pipeline runs strictly in this order; each stage depends on the
//! last and none of them retain state across documents:
//!
//! 1. **Token model** ([`token`]) — the closed [`token::TokenKind`]
//!    vocabulary plus [`token::Token`], with context-sensitive keyword
//!    downgrading driven by [`lexer`]'s mode stack.
//! 2. **Lexer** ([`lexer`]) — `source → Vec<Token>`, total over any input.
//! 3. **AST model** ([`ast`]) — tagged variants identified by token index,
//!    not byte offset or arena pointer.
//! 4. **Parser** ([`parser`]) — `Vec<Token> → (CalDocument, Vec<ParseError>)`,
//!    recursive descent with bounded local recovery; never panics.
//! 5. **Symbol table** ([`symbols`]) — `&CalDocument → SymbolTable`, an
//!    offset-indexed scope tree supporting positional lookup.
//! 6. **Semantic tokens** ([`semantic_tokens`]) — `(&[Token], &CalDocument)
//!    → Vec<lsp_types::SemanticToken>`, delta-encoded per the LSP protocol.
//!
//! [`line_index`] and [`diagnostics`] sit alongside this pipeline rather
//! than in it: they translate [`error::LexError`]/[`error::ParseError`]
//! into `lsp_types::Diagnostic`s for a host that wants to surface them.
//! [`attributes`] is the other non-pipeline table: the known-attribute
//! registry a host validator consults as part of the `builtins` it's
//! handed alongside the AST and symbol table.

pub mod ast;
pub mod attributes;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod line_index;
pub mod parser;
pub mod semantic_tokens;
pub mod symbols;
pub mod token;

pub use ast::CalDocument;
pub use attributes::is_known_attribute;
pub use error::{LexError, LexErrorKind, ParseError, ParseErrorKind, Severity};
pub use lexer::lex;
pub use line_index::LineIndex;
pub use parser::Parser;
pub use symbols::{Scope, Symbol, SymbolKind, SymbolTable};
pub use token::{Token, TokenKind};
