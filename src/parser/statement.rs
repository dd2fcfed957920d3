//! Statement grammar, mirroring the teacher's `parse_statement`
//! dispatch (`compiler/parser/src/parser/statement.rs`) and top-level
//! loop (`.../parser/file.rs`).

use super::{Parser, MAX_ARITY};
use crate::ast::{Block, FunctionDecl, IfStmt, ReturnStmt, Statement, VarDecl, WhileStmt};
use crate::error::Result;
use crate::token::TokenKind;

impl Parser {
    /// `declaration → funDecl | varDecl | statement`
    pub(super) fn declaration(&mut self) -> Result<Statement> {
        if self.cursor.eat(&TokenKind::Fn) {
            return self.function_decl();
        }
        if self.cursor.eat(&TokenKind::Let) {
            return self.var_decl();
        }
        self.statement()
    }

    /// `funDecl → "fn" ID "(" params? ")" block`
    fn function_decl(&mut self) -> Result<Statement> {
        let name = self.cursor.expect_identifier("Expect function name")?;
        self.cursor.expect(&TokenKind::LParen, "Expect '(' after function name")?;

        let mut params = Vec::new();
        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                if params.len() >= MAX_ARITY {
                    return Err(self.cursor.error_at_current(&format!("Can't have more than {MAX_ARITY} parameters")));
                }
                params.push(self.cursor.expect_identifier("Expect parameter name")?);
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect(&TokenKind::RParen, "Expect ')' after parameters")?;

        self.cursor.expect(&TokenKind::LBrace, "Expect '{' before function body")?;
        let body = self.block_statements()?;

        Ok(Statement::FunctionDecl(FunctionDecl { name, params, body }))
    }

    /// `varDecl → "let" ID ( "=" expr )? ";"`
    fn var_decl(&mut self) -> Result<Statement> {
        let name = self.cursor.expect_identifier("Expect variable name")?;
        let initializer = if self.cursor.eat(&TokenKind::Assign) { Some(Box::new(self.expression()?)) } else { None };
        self.cursor.expect(&TokenKind::Semicolon, "Expect ';' after variable declaration")?;
        Ok(Statement::VarDecl(VarDecl { name, initializer }))
    }

    /// `statement → printStmt | ifStmt | whileStmt | returnStmt | block | exprStmt`
    fn statement(&mut self) -> Result<Statement> {
        if self.cursor.eat(&TokenKind::Print) {
            return self.print_statement();
        }
        if self.cursor.eat(&TokenKind::If) {
            return self.if_statement();
        }
        if self.cursor.eat(&TokenKind::While) {
            return self.while_statement();
        }
        if self.cursor.check(&TokenKind::Return) {
            return self.return_statement();
        }
        if self.cursor.eat(&TokenKind::LBrace) {
            return Ok(Statement::Block(Block { statements: self.block_statements()? }));
        }
        self.expression_statement()
    }

    /// `printStmt → "print" "(" expr ")" ";"`
    fn print_statement(&mut self) -> Result<Statement> {
        self.cursor.expect(&TokenKind::LParen, "Expect '(' after 'print'")?;
        let value = self.expression()?;
        self.cursor.expect(&TokenKind::RParen, "Expect ')' after value")?;
        self.cursor.expect(&TokenKind::Semicolon, "Expect ';' after value")?;
        Ok(Statement::Print(Box::new(value)))
    }

    /// `ifStmt → "if" "(" expr ")" statement ( "else" statement )?`
    fn if_statement(&mut self) -> Result<Statement> {
        self.cursor.expect(&TokenKind::LParen, "Expect '(' after 'if'")?;
        let condition = Box::new(self.expression()?);
        self.cursor.expect(&TokenKind::RParen, "Expect ')' after if condition")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.cursor.eat(&TokenKind::Else) { Some(Box::new(self.statement()?)) } else { None };

        Ok(Statement::If(IfStmt { condition, then_branch, else_branch }))
    }

    /// `whileStmt → "while" "(" expr ")" statement`
    fn while_statement(&mut self) -> Result<Statement> {
        self.cursor.expect(&TokenKind::LParen, "Expect '(' after 'while'")?;
        let condition = Box::new(self.expression()?);
        self.cursor.expect(&TokenKind::RParen, "Expect ')' after while condition")?;
        let body = Box::new(self.statement()?);
        Ok(Statement::While(WhileStmt { condition, body }))
    }

    /// `returnStmt → "return" expr? ";"`
    fn return_statement(&mut self) -> Result<Statement> {
        let keyword = self.cursor.bump();
        let value = if self.cursor.check(&TokenKind::Semicolon) { None } else { Some(Box::new(self.expression()?)) };
        self.cursor.expect(&TokenKind::Semicolon, "Expect ';' after return value")?;
        Ok(Statement::Return(ReturnStmt { keyword, value }))
    }

    /// `block → "{" declaration* "}"`, called after the leading `{` has
    /// already been consumed by the caller.
    fn block_statements(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) && !self.cursor.is_at_end() {
            statements.push(self.declaration()?);
        }
        self.cursor.expect(&TokenKind::RBrace, "Expect '}' after block")?;
        Ok(statements)
    }

    /// `exprStmt → expr ";"`
    fn expression_statement(&mut self) -> Result<Statement> {
        let expr = self.expression()?;
        self.cursor.expect(&TokenKind::Semicolon, "Expect ';' after expression")?;
        Ok(Statement::Expression(Box::new(expr)))
    }
}
