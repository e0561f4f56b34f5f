//! Statement nodes, including the `CaseBranch` shape central to error
//! recovery (see `crate::parser::stmt`).

use super::expr::Expression;
use super::TokenIndex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ForDirection {
    To,
    DownTo,
}

/// `value {, value} ':' statement`. During recovery `statements` may be
/// empty and `end_token` points to wherever the parser's recovery loop
/// actually stopped advancing — never to an earlier anchor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaseBranch {
    pub values: Vec<Expression>,
    pub statements: Vec<Statement>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Statement {
    Assign {
        target: Expression,
        value: Expression,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    If {
        cond: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Case {
        expr: Expression,
        branches: Vec<CaseBranch>,
        else_branch: Option<Vec<Statement>>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    While {
        cond: Expression,
        body: Box<Statement>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Repeat {
        body: Vec<Statement>,
        until: Expression,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    With {
        expr: Expression,
        body: Box<Statement>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    For {
        var_name: String,
        from: Expression,
        to: Expression,
        direction: ForDirection,
        body: Box<Statement>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Exit {
        value: Option<Expression>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    /// A bare expression statement, almost always a procedure call.
    Call {
        callee: Expression,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    Compound {
        statements: Vec<Statement>,
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
    /// A span the parser could not structure as any known statement; holds
    /// the raw token range it skipped over.
    Error {
        start_token: TokenIndex,
        end_token: TokenIndex,
    },
}

impl Statement {
    pub fn start_token(&self) -> TokenIndex {
        match self {
            Statement::Assign { start_token, .. }
            | Statement::If { start_token, .. }
            | Statement::Case { start_token, .. }
            | Statement::While { start_token, .. }
            | Statement::Repeat { start_token, .. }
            | Statement::With { start_token, .. }
            | Statement::For { start_token, .. }
            | Statement::Exit { start_token, .. }
            | Statement::Call { start_token, .. }
            | Statement::Compound { start_token, .. }
            | Statement::Error { start_token, .. } => *start_token,
        }
    }

    pub fn end_token(&self) -> TokenIndex {
        match self {
            Statement::Assign { end_token, .. }
            | Statement::If { end_token, .. }
            | Statement::Case { end_token, .. }
            | Statement::While { end_token, .. }
            | Statement::Repeat { end_token, .. }
            | Statement::With { end_token, .. }
            | Statement::For { end_token, .. }
            | Statement::Exit { end_token, .. }
            | Statement::Call { end_token, .. }
            | Statement::Compound { end_token, .. }
            | Statement::Error { end_token, .. } => *end_token,
        }
    }
}
