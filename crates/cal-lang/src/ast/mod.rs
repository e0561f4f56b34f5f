//! Tagged-variant AST for C/AL.
//!
//! Every node stores `start_token`/`end_token`: inclusive indices into the
//! parser's token slice, not byte offsets. Byte offsets are recovered on
//! demand via `tokens[node.start_token].start_offset` and its `end_offset`
//! counterpart. This keeps nodes cheap index pairs instead of carrying
//! cloned tokens, and makes the node-bounds invariant a plain index
//! comparison.
//!
//! The tree is a single closed set of tagged variants built once per parse
//! and walked with ordinary shared borrows (symbol collection, semantic
//! token refinement) — no arena.

pub mod expr;
pub mod object;
pub mod stmt;

pub use expr::{BinaryOp, Expression, LiteralKind, UnaryOp};
pub use object::{
    Actions, CalDocument, Code, Controls, Elements, Field, Fields, Key, Keys, Object,
    ObjectKind, ObjectProperties, Parameter, Procedure, Properties, PropertyEntry, SectionItem,
    SkippedSection, TriggerBody, VarDecl,
};
pub use stmt::{CaseBranch, ForDirection, Statement};

pub type TokenIndex = u32;
