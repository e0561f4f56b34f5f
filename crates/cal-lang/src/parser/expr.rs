//! Expression parsing: standard precedence climbing plus the set-literal
//! and range forms used by `IN` and `FOR`.
//!
//! Precedence, low to high: `OR` < `AND` < comparison < additive <
//! multiplicative < unary < postfix (`.`, `[]`, call).

use super::Parser;
use crate::ast::*;
use crate::error::ParseErrorKind;
use crate::token::TokenKind;

impl Parser {
    pub(super) fn parse_expression(&mut self) -> Expression {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Expression {
        let mut left = self.parse_and();
        loop {
            self.next_significant();
            if !self.check(TokenKind::Or) {
                break;
            }
            let start = left.start_token();
            self.advance();
            self.next_significant();
            let right = self.parse_and();
            let end = right.end_token();
            left = Expression::Binary { op: BinaryOp::Or, left: Box::new(left), right: Box::new(right), start_token: start, end_token: end };
        }
        left
    }

    fn parse_and(&mut self) -> Expression {
        let mut left = self.parse_comparison();
        loop {
            self.next_significant();
            if !self.check(TokenKind::And) {
                break;
            }
            let start = left.start_token();
            self.advance();
            self.next_significant();
            let right = self.parse_comparison();
            let end = right.end_token();
            left = Expression::Binary { op: BinaryOp::And, left: Box::new(left), right: Box::new(right), start_token: start, end_token: end };
        }
        left
    }

    fn parse_comparison(&mut self) -> Expression {
        let mut left = self.parse_additive();
        loop {
            self.next_significant();
            let op = match self.current().kind {
                TokenKind::Eq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                TokenKind::In => BinaryOp::In,
                _ => break,
            };
            let start = left.start_token();
            self.advance();
            self.next_significant();
            let right = if op == BinaryOp::In { self.parse_set_literal() } else { self.parse_additive() };
            let end = right.end_token();
            left = Expression::Binary { op, left: Box::new(left), right: Box::new(right), start_token: start, end_token: end };
        }
        left
    }

    fn parse_additive(&mut self) -> Expression {
        let mut left = self.parse_multiplicative();
        loop {
            self.next_significant();
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let start = left.start_token();
            self.advance();
            self.next_significant();
            let right = self.parse_multiplicative();
            let end = right.end_token();
            left = Expression::Binary { op, left: Box::new(left), right: Box::new(right), start_token: start, end_token: end };
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Expression {
        let mut left = self.parse_unary();
        loop {
            self.next_significant();
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Div => BinaryOp::IntDiv,
                TokenKind::Mod => BinaryOp::Mod,
                _ => break,
            };
            let start = left.start_token();
            self.advance();
            self.next_significant();
            let right = self.parse_unary();
            let end = right.end_token();
            left = Expression::Binary { op, left: Box::new(left), right: Box::new(right), start_token: start, end_token: end };
        }
        left
    }

    fn parse_unary(&mut self) -> Expression {
        self.next_significant();
        let start = self.current_index();
        match self.current().kind {
            TokenKind::Not => {
                self.advance();
                self.next_significant();
                let operand = Box::new(self.parse_unary());
                let end = operand.end_token();
                Expression::Unary { op: UnaryOp::Not, operand, start_token: start, end_token: end }
            }
            TokenKind::Minus => {
                self.advance();
                self.next_significant();
                let operand = Box::new(self.parse_unary());
                let end = operand.end_token();
                Expression::Unary { op: UnaryOp::Neg, operand, start_token: start, end_token: end }
            }
            TokenKind::Plus => {
                self.advance();
                self.next_significant();
                let operand = Box::new(self.parse_unary());
                let end = operand.end_token();
                Expression::Unary { op: UnaryOp::Plus, operand, start_token: start, end_token: end }
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Expression {
        let start = self.current_index();
        let mut expr = self.parse_primary();
        loop {
            self.next_significant();
            match self.current().kind {
                TokenKind::Dot => {
                    self.advance();
                    self.next_significant();
                    let member_tok = self.current_index();
                    let member = self.current().identifier_name().to_string();
                    self.advance();
                    expr = Expression::Member { object: Box::new(expr), member, start_token: start, end_token: member_tok };
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.next_significant();
                    let index = self.parse_expression();
                    self.next_significant();
                    let end = self.expect(TokenKind::RBracket, ParseErrorKind::ExpectedToken, "Expected ] to close index expression");
                    expr = Expression::Index { object: Box::new(expr), index: Box::new(index), start_token: start, end_token: end };
                }
                TokenKind::LParen => {
                    self.advance();
                    let mut args = Vec::new();
                    self.next_significant();
                    if !self.check(TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expression());
                            self.next_significant();
                            if self.match_kind(TokenKind::Comma).is_none() {
                                break;
                            }
                            self.next_significant();
                        }
                    }
                    self.next_significant();
                    let end = self.expect(TokenKind::RParen, ParseErrorKind::ExpectedToken, "Expected ) to close call arguments");
                    expr = Expression::Call { callee: Box::new(expr), args, start_token: start, end_token: end };
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> Expression {
        self.next_significant();
        let idx = self.current_index();
        let kind = self.current().kind;
        match kind {
            TokenKind::Integer => {
                let text = self.current().text.clone();
                self.advance();
                Expression::Literal { kind: LiteralKind::Integer, text, start_token: idx, end_token: idx }
            }
            TokenKind::Decimal => {
                let text = self.current().text.clone();
                self.advance();
                Expression::Literal { kind: LiteralKind::Decimal, text, start_token: idx, end_token: idx }
            }
            TokenKind::StringLit => {
                let text = self.current().text.clone();
                self.advance();
                Expression::Literal { kind: LiteralKind::String, text, start_token: idx, end_token: idx }
            }
            TokenKind::Date => {
                let text = self.current().text.clone();
                self.advance();
                Expression::Literal { kind: LiteralKind::Date, text, start_token: idx, end_token: idx }
            }
            TokenKind::Time => {
                let text = self.current().text.clone();
                self.advance();
                Expression::Literal { kind: LiteralKind::Time, text, start_token: idx, end_token: idx }
            }
            TokenKind::DateTime => {
                let text = self.current().text.clone();
                self.advance();
                Expression::Literal { kind: LiteralKind::DateTime, text, start_token: idx, end_token: idx }
            }
            TokenKind::Boolean => {
                let text = self.current().text.clone();
                self.advance();
                Expression::Literal { kind: LiteralKind::Boolean, text, start_token: idx, end_token: idx }
            }
            TokenKind::Identifier | TokenKind::QuotedIdentifier => {
                let name = self.current().identifier_name().to_string();
                self.advance();
                Expression::Identifier { name, start_token: idx, end_token: idx }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression();
                self.next_significant();
                self.expect(TokenKind::RParen, ParseErrorKind::ExpectedToken, "Expected ) to close parenthesized expression");
                inner
            }
            TokenKind::LBracket => self.parse_set_literal(),
            _ => {
                self.error_at(
                    format!("Expected an expression, found '{}'", self.current().text),
                    ParseErrorKind::ExpectedToken,
                );
                self.advance();
                Expression::Error { start_token: idx, end_token: idx }
            }
        }
    }

    /// `[e1, e2, …]`, possibly empty; each element may be a `from..to`
    /// range.
    fn parse_set_literal(&mut self) -> Expression {
        let start = self.current_index();
        self.expect(TokenKind::LBracket, ParseErrorKind::ExpectedToken, "Expected [ to open set literal");

        let mut elements = Vec::new();
        self.next_significant();
        if !self.check(TokenKind::RBracket) {
            loop {
                elements.push(self.parse_set_element());
                self.next_significant();
                if self.match_kind(TokenKind::Comma).is_none() {
                    break;
                }
                self.next_significant();
            }
        }
        self.next_significant();
        let end = self.expect(TokenKind::RBracket, ParseErrorKind::ExpectedToken, "Expected ] to close set literal");
        Expression::Set { elements, start_token: start, end_token: end }
    }

    fn parse_set_element(&mut self) -> Expression {
        let first = self.parse_expression();
        self.next_significant();
        if self.match_kind(TokenKind::DotDot).is_some() {
            let start = first.start_token();
            self.next_significant();
            let second = self.parse_expression();
            let end = second.end_token();
            Expression::Range { from: Box::new(first), to: Box::new(second), start_token: start, end_token: end }
        } else {
            first
        }
    }
}
