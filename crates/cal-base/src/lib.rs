//! # cal-base
//!
//! Pure structural atoms for the C/AL analyzer.
//!
//! This crate provides the foundational types shared by the lexer, parser,
//! symbol table, and semantic-token provider in `cal-lang`:
//!
//! - [`Span`] — byte-offset source location tracking
//! - [`SpannedError`]/[`Result`] — errors annotated with a source location
//!
//! # Design Principles
//!
//! This crate has no knowledge of C/AL syntax or of the LSP protocol. It
//! provides only generic, reusable infrastructure that `cal-lang` builds on.

pub mod error;
pub mod span;

pub use error::{Result, SpannedError};
pub use span::Span;
