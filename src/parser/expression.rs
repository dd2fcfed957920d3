//! Expression grammar: `assignment → equality → comparison → term →
//! factor → unary → call → primary`, each level one method, following
//! the teacher's `parse_expression → ... → parse_primary_expression`
//! chain (`compiler/parser/src/parser/expression.rs`) and its generic
//! `parse_bin_expr` shape, generalized here to the non-LL(1) assignment
//! rule and this language's specific operator set.

use super::{Parser, MAX_ARITY};
use crate::ast::Expr;
use crate::error::{Error, Result};
use crate::token::TokenKind;

impl Parser {
    /// `expr → assignment`
    pub(super) fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    /// `assignment → equality ( "=" assignment )?`
    ///
    /// The left-hand side is parsed as an ordinary `equality` expression
    /// first; only once a trailing `=` is seen do we check, after the
    /// fact, whether that left-hand side was syntactically an
    /// `Identifier`. This is the grammar's one non-LL(1) wrinkle.
    pub(super) fn assignment(&mut self) -> Result<Expr> {
        let expr = self.equality()?;

        if self.cursor.eat(&TokenKind::Assign) {
            let equals_line = self.cursor.previous().line();
            let value = self.assignment()?;
            return match expr {
                Expr::Identifier(name) => Ok(Expr::Assign { name, value: Box::new(value) }),
                _ => Err(Error::parse("Invalid assignment target", equals_line)),
            };
        }

        Ok(expr)
    }

    /// `equality → comparison ( ("==" | "!=") comparison )*`
    pub(super) fn equality(&mut self) -> Result<Expr> {
        self.binary(Self::comparison, &[TokenKind::Eq, TokenKind::Neq])
    }

    /// `comparison → term ( ("<" | "<=" | ">" | ">=") term )*`
    pub(super) fn comparison(&mut self) -> Result<Expr> {
        self.binary(Self::term, &[TokenKind::Lt, TokenKind::Lte, TokenKind::Gt, TokenKind::Gte])
    }

    /// `term → factor ( ("+" | "-") factor )*`
    pub(super) fn term(&mut self) -> Result<Expr> {
        self.binary(Self::factor, &[TokenKind::Plus, TokenKind::Minus])
    }

    /// `factor → unary ( ("*" | "/") unary )*`
    pub(super) fn factor(&mut self) -> Result<Expr> {
        self.binary(Self::unary, &[TokenKind::Multiply, TokenKind::Divide])
    }

    /// Shared left-associative binary-operator climbing step: parse one
    /// operand at `next` precedence, then fold in each subsequent
    /// `operator operand` pair at this level.
    fn binary(&mut self, next: fn(&mut Self) -> Result<Expr>, operators: &[TokenKind]) -> Result<Expr> {
        let mut expr = next(self)?;
        while operators.iter().any(|k| self.cursor.check(k)) {
            let operator = self.cursor.bump();
            let right = next(self)?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    /// `unary → ("!" | "-") unary | call`
    pub(super) fn unary(&mut self) -> Result<Expr> {
        if self.cursor.check(&TokenKind::Not) || self.cursor.check(&TokenKind::Minus) {
            let operator = self.cursor.bump();
            let right = self.unary()?;
            return Ok(Expr::Unary { operator, right: Box::new(right) });
        }
        self.call()
    }

    /// `call → primary ( "(" args? ")" )*`
    ///
    /// The postfix `(...)` repeats so `f()()` parses as two chained
    /// calls over the same callee expression.
    pub(super) fn call(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;
        loop {
            if self.cursor.eat(&TokenKind::LParen) {
                expr = self.finish_call(expr)?;
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr> {
        let mut arguments = Vec::new();
        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                if arguments.len() >= MAX_ARITY {
                    return Err(self.cursor.error_at_current(&format!("Can't have more than {MAX_ARITY} arguments")));
                }
                arguments.push(self.expression()?);
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let paren = self.cursor.expect(&TokenKind::RParen, "Expect ')' after arguments")?;
        Ok(Expr::Call { callee: Box::new(callee), paren, arguments })
    }

    /// `primary → INTEGER | FLOAT | STRING | "true" | "false" | "nil"
    ///          | ID | "(" expr ")"`
    pub(super) fn primary(&mut self) -> Result<Expr> {
        let token = self.cursor.peek().clone();
        match &token.kind {
            TokenKind::Integer(_) | TokenKind::Float(_) | TokenKind::Str(_) | TokenKind::True | TokenKind::False | TokenKind::Nil => {
                self.cursor.bump();
                Ok(Expr::Literal(token))
            }
            TokenKind::Ident(_) => {
                self.cursor.bump();
                Ok(Expr::Identifier(token))
            }
            TokenKind::LParen => {
                self.cursor.bump();
                let expr = self.expression()?;
                self.cursor.expect(&TokenKind::RParen, "Expect ')' after expression")?;
                Ok(expr)
            }
            _ => Err(self.cursor.error_at_current("Expect expression")),
        }
    }
}
