//! Declarations, procedures, and statements — including the central
//! `CaseBranch` recovery algorithm.

use super::Parser;
use crate::ast::*;
use crate::error::ParseErrorKind;
use crate::token::TokenKind;

impl Parser {
    pub(super) fn parse_var_entries(&mut self) -> Vec<VarDecl> {
        let mut decls = Vec::new();
        loop {
            self.next_significant();
            if !matches!(self.current().kind, TokenKind::Identifier | TokenKind::QuotedIdentifier) {
                break;
            }
            decls.push(self.parse_var_decl());
        }
        decls
    }

    fn parse_var_decl(&mut self) -> VarDecl {
        let start = self.current_index();
        let name_token = start;
        let name = self.current().identifier_name().to_string();
        self.advance();

        let index = self.parse_optional_at_index();

        self.next_significant();
        self.expect(TokenKind::Colon, ParseErrorKind::MalformedDeclaration, "Expected : in variable declaration");
        self.next_significant();
        let type_name = self.scan_raw_value_until_semicolon();

        self.next_significant();
        let before_term = self.current_index();
        let end = self
            .match_kind(TokenKind::Semicolon)
            .unwrap_or_else(|| if before_term > start { before_term - 1 } else { start });

        VarDecl { name, name_token, index, type_name, start_token: start, end_token: end }
    }

    fn parse_optional_at_index(&mut self) -> Option<u32> {
        if self.check(TokenKind::AtIndex) {
            let text = self.current().text.clone();
            self.advance();
            text.trim_start_matches('@').parse().ok()
        } else {
            None
        }
    }

    pub(super) fn parse_procedure(&mut self) -> Procedure {
        let start = self.current_index();
        self.advance(); // PROCEDURE
        self.next_significant();

        let name_token = self.current_index();
        let name = self.current().identifier_name().to_string();
        self.advance();
        let index = self.parse_optional_at_index();

        self.next_significant();
        self.expect(TokenKind::LParen, ParseErrorKind::MalformedDeclaration, "Expected ( in procedure signature");

        let mut parameters = Vec::new();
        self.next_significant();
        if !self.check(TokenKind::RParen) {
            loop {
                parameters.push(self.parse_parameter());
                self.next_significant();
                if self.match_kind(TokenKind::Semicolon).is_none() {
                    break;
                }
                self.next_significant();
            }
        }
        self.next_significant();
        self.expect(TokenKind::RParen, ParseErrorKind::MalformedDeclaration, "Expected ) in procedure signature");

        self.next_significant();
        let return_type = if self.match_kind(TokenKind::Colon).is_some() {
            self.next_significant();
            Some(self.scan_raw_value_until_semicolon())
        } else {
            None
        };
        self.next_significant();
        self.match_kind(TokenKind::Semicolon);

        let mut local_vars = Vec::new();
        self.next_significant();
        if self.check(TokenKind::Var) {
            self.advance();
            local_vars = self.parse_var_entries();
        }

        self.next_significant();
        self.expect(TokenKind::Begin, ParseErrorKind::MalformedDeclaration, "Expected BEGIN in procedure body");
        let body = self.parse_statement_list_until_end();
        let mut end = self.expect(TokenKind::End, ParseErrorKind::MissingClosingBrace, "Expected END to close procedure");
        self.next_significant();
        if let Some(semi) = self.match_kind(TokenKind::Semicolon) {
            end = semi;
        }

        Procedure { name, name_token, index, parameters, return_type, local_vars, body, start_token: start, end_token: end }
    }

    fn parse_parameter(&mut self) -> Parameter {
        let start = self.current_index();
        self.next_significant();
        let is_var = self.match_kind(TokenKind::Var).is_some();

        self.next_significant();
        let name_token = self.current_index();
        let name = self.current().identifier_name().to_string();
        self.advance();

        self.next_significant();
        self.expect(TokenKind::Colon, ParseErrorKind::MalformedDeclaration, "Expected : in parameter");
        self.next_significant();
        let before = self.current_index();
        let type_name = self.scan_raw_tokens_until(|k| matches!(k, TokenKind::Semicolon | TokenKind::RParen));
        let after = self.current_index();
        let end = if after > before { after - 1 } else { name_token };

        Parameter { name, name_token, is_var, type_name, start_token: start, end_token: end }
    }

    // ---- statement lists ----

    pub(super) fn parse_statement_list_until_end(&mut self) -> Vec<Statement> {
        self.parse_statement_list_until(|k| k == TokenKind::End)
    }

    fn parse_statement_list_until(&mut self, stop: impl Fn(TokenKind) -> bool) -> Vec<Statement> {
        let mut stmts = Vec::new();
        loop {
            self.next_significant();
            if self.is_eof() || stop(self.current().kind) {
                break;
            }
            stmts.push(self.parse_statement());
            self.next_significant();
            self.match_kind(TokenKind::Semicolon);
        }
        stmts
    }

    pub(super) fn parse_statement(&mut self) -> Statement {
        self.next_significant();
        match self.current().kind {
            TokenKind::Begin => self.parse_compound(),
            TokenKind::If => self.parse_if(),
            TokenKind::Case => self.parse_case(),
            TokenKind::While => self.parse_while(),
            TokenKind::Repeat => self.parse_repeat(),
            TokenKind::With => self.parse_with(),
            TokenKind::For => self.parse_for(),
            TokenKind::Exit => self.parse_exit(),
            TokenKind::Eof => {
                let idx = self.current_index();
                Statement::Error { start_token: idx, end_token: idx }
            }
            _ => self.parse_assign_or_call(),
        }
    }

    fn parse_compound(&mut self) -> Statement {
        let start = self.advance(); // BEGIN
        let statements = self.parse_statement_list_until_end();
        let end = self.expect(TokenKind::End, ParseErrorKind::MissingClosingBrace, "Expected END to close BEGIN block");
        Statement::Compound { statements, start_token: start, end_token: end }
    }

    fn parse_if(&mut self) -> Statement {
        let start = self.advance(); // IF
        let cond = self.parse_expression();
        self.next_significant();
        self.expect(TokenKind::Then, ParseErrorKind::ExpectedToken, "Expected THEN after IF condition");
        let then_branch = Box::new(self.parse_statement());
        let mut end = then_branch.end_token();

        self.next_significant();
        let else_branch = if self.match_kind(TokenKind::Else).is_some() {
            let stmt = Box::new(self.parse_statement());
            end = stmt.end_token();
            Some(stmt)
        } else {
            None
        };

        Statement::If { cond, then_branch, else_branch, start_token: start, end_token: end }
    }

    fn parse_while(&mut self) -> Statement {
        let start = self.advance(); // WHILE
        let cond = self.parse_expression();
        self.next_significant();
        self.expect(TokenKind::Do, ParseErrorKind::ExpectedToken, "Expected DO after WHILE condition");
        let body = Box::new(self.parse_statement());
        let end = body.end_token();
        Statement::While { cond, body, start_token: start, end_token: end }
    }

    fn parse_repeat(&mut self) -> Statement {
        let start = self.advance(); // REPEAT
        let body = self.parse_statement_list_until(|k| k == TokenKind::Until);
        self.expect(TokenKind::Until, ParseErrorKind::ExpectedToken, "Expected UNTIL to close REPEAT");
        let until = self.parse_expression();
        let end = until.end_token();
        Statement::Repeat { body, until, start_token: start, end_token: end }
    }

    fn parse_with(&mut self) -> Statement {
        let start = self.advance(); // WITH
        let expr = self.parse_expression();
        self.next_significant();
        self.expect(TokenKind::Do, ParseErrorKind::ExpectedToken, "Expected DO after WITH expression");
        let body = Box::new(self.parse_statement());
        let end = body.end_token();
        Statement::With { expr, body, start_token: start, end_token: end }
    }

    fn parse_for(&mut self) -> Statement {
        let start = self.advance(); // FOR
        self.next_significant();
        let var_name = self.current().identifier_name().to_string();
        self.advance();

        self.next_significant();
        self.expect(TokenKind::Assign, ParseErrorKind::ExpectedToken, "Expected := in FOR");
        let from = self.parse_expression();

        self.next_significant();
        let direction = if self.match_kind(TokenKind::To).is_some() {
            ForDirection::To
        } else if self.match_kind(TokenKind::DownTo).is_some() {
            ForDirection::DownTo
        } else {
            self.error_at("Expected TO or DOWNTO in FOR", ParseErrorKind::ExpectedToken);
            ForDirection::To
        };
        let to = self.parse_expression();

        self.next_significant();
        self.expect(TokenKind::Do, ParseErrorKind::ExpectedToken, "Expected DO after FOR range");
        let body = Box::new(self.parse_statement());
        let end = body.end_token();

        Statement::For { var_name, from, to, direction, body, start_token: start, end_token: end }
    }

    fn parse_exit(&mut self) -> Statement {
        let start = self.advance(); // EXIT
        let mut end = start;
        let value = if self.check(TokenKind::LParen) {
            self.advance();
            let e = self.parse_expression();
            end = e.end_token();
            self.next_significant();
            let close = self.expect(TokenKind::RParen, ParseErrorKind::ExpectedToken, "Expected ) to close EXIT");
            end = close;
            Some(e)
        } else {
            None
        };
        Statement::Exit { value, start_token: start, end_token: end }
    }

    fn parse_assign_or_call(&mut self) -> Statement {
        let start = self.current_index();
        let expr = self.parse_expression();
        self.next_significant();
        if self.match_kind(TokenKind::Assign).is_some() {
            let value = self.parse_expression();
            let end = value.end_token();
            Statement::Assign { target: expr, value, start_token: start, end_token: end }
        } else {
            let end = expr.end_token();
            Statement::Call { callee: expr, start_token: start, end_token: end }
        }
    }

    // ---- CASE and the central recovery algorithm ----

    pub(super) fn parse_case(&mut self) -> Statement {
        let start = self.advance(); // CASE
        let expr = self.parse_expression();
        self.next_significant();
        self.expect(TokenKind::Of, ParseErrorKind::ExpectedToken, "Expected OF after CASE expression");

        let mut branches = Vec::new();
        loop {
            self.next_significant();
            self.match_kind(TokenKind::Semicolon);
            if self.is_eof() || self.check(TokenKind::End) || self.check(TokenKind::Else) {
                break;
            }
            branches.push(self.parse_case_branch());
        }

        let else_branch = if self.match_kind(TokenKind::Else).is_some() {
            Some(self.parse_statement_list_until_end())
        } else {
            None
        };

        let end = self.expect(TokenKind::End, ParseErrorKind::MissingClosingBrace, "Expected END to close CASE");
        Statement::Case { expr, branches, else_branch, start_token: start, end_token: end }
    }

    fn parse_case_branch(&mut self) -> CaseBranch {
        let start = self.current_index();
        let mut values = vec![self.parse_expression()];
        loop {
            self.next_significant();
            if self.match_kind(TokenKind::Comma).is_none() {
                break;
            }
            self.next_significant();
            values.push(self.parse_expression());
        }

        self.next_significant();
        if self.match_kind(TokenKind::Colon).is_some() {
            let stmt = self.parse_statement();
            let end = stmt.end_token();
            CaseBranch { values, statements: vec![stmt], start_token: start, end_token: end }
        } else {
            self.error_at("Expected : after case branch value", ParseErrorKind::CaseBranchMissingColon);
            let last_value_end = values.last().expect("at least one value parsed").end_token();
            let end = self.recover_case_branch(last_value_end);
            CaseBranch { values, statements: Vec::new(), start_token: start, end_token: end }
        }
    }

    /// Step 3/4 of the CaseBranch recovery algorithm (see module docs):
    /// advances past tokens until a plausible next case value, `ELSE`,
    /// `END`, or a would-be-terminating `;`, never consuming the stop
    /// token. Returns the last token advanced past, or `before` unchanged
    /// if the loop ran zero iterations.
    fn recover_case_branch(&mut self, before: TokenIndex) -> TokenIndex {
        let mut last = before;
        loop {
            self.next_significant();
            if self.is_eof() {
                break;
            }
            if matches!(self.current().kind, TokenKind::Else | TokenKind::End | TokenKind::Semicolon) {
                break;
            }
            if matches!(self.current().kind, TokenKind::Integer | TokenKind::StringLit) && self.at_line_start() {
                break;
            }
            last = self.advance();
        }
        last
    }

    fn at_line_start(&self) -> bool {
        if self.pos == 0 {
            return true;
        }
        self.tokens[self.pos - 1].line != self.current().line
    }
}
