//! Expression nodes.

use super::TokenIndex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LiteralKind {
    Integer,
    Decimal,
    String,
    Date,
    Time,
    DateTime,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
}

/// An expression node. Every variant carries `start_token`/`end_token`
/// (inclusive token indices) rather than byte offsets; offsets are
/// recovered on demand from the parser's token table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expression {
    Literal {
        kind: LiteralKind,
        text: String,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Identifier {
        name: String,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Member {
        object: Box<Expression>,
        member: String,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Range {
        from: Box<Expression>,
        to: Box<Expression>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Set {
        elements: Vec<Expression>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    /// An expression the parser could not make sense of; holds its token
    /// span so surrounding nodes still get valid bounds.
    Error {
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
}

impl Expression {
    pub fn start_token(&self) -> TokenIndex {
        match self {
            Expression::Literal { start_token, .. }
            | Expression::Identifier { start_token, .. }
            | Expression::Member { start_token, .. }
            | Expression::Index { start_token, .. }
            | Expression::Call { start_token, .. }
            | Expression::Unary { start_token, .. }
            | Expression::Binary { start_token, .. }
            | Expression::Range { start_token, .. }
            | Expression::Set { start_token, .. }
            | Expression::Error { start_token, .. } => *start_token,
        }
    }

    pub fn end_token(&self) -> TokenIndex {
        match self {
            Expression::Literal { end_token, .. }
            | Expression::Identifier { end_token, .. }
            | Expression::Member { end_token, .. }
            | Expression::Index { end_token, .. }
            | Expression::Call { end_token, .. }
            | Expression::Unary { end_token, .. }
            | Expression::Binary { end_token, .. }
            | Expression::Range { end_token, .. }
            | Expression::Set { end_token, .. }
            | Expression::Error { end_token, .. } => *end_token,
        }
    }
}
