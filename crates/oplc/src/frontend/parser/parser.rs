//! Recursive descent parser for OPLang

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser for OPLang
///
/// Works over the full token vector so declarations can be told apart from
/// assignments with a few tokens of lookahead.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser for the given source
    pub fn new(source: &str) -> CompileResult<Self> {
        let tokens = Lexer::new(source).tokenize_all()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Create a parser over already scanned tokens
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));
        }
        Self { tokens, pos: 0 }
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> CompileResult<Program> {
        let start = self.current().span;
        let mut classes = Vec::new();

        while !self.at_end() {
            classes.push(self.parse_class()?);
        }

        Ok(Program::new(classes, start.merge(self.current().span)))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn prev_span(&self) -> Span {
        match self.pos {
            0 => self.current().span,
            n => self.tokens[n - 1].span,
        }
    }

    fn at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(&kind.to_string()))
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<(String, Span)> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok((name, token.span))
            }
            _ => Err(self.error_expected("identifier")),
        }
    }

    fn error_expected(&self, what: &str) -> CompileError {
        CompileError::parser(
            format!("expected {}, found {}", what, self.current().kind),
            self.current().span,
        )
    }

    // =========================================================================
    // Classes and members
    // =========================================================================

    fn parse_class(&mut self) -> CompileResult<ClassDecl> {
        let start = self.expect(TokenKind::Class)?.span;
        let (name, name_span) = self.expect_identifier()?;

        let (parent, parent_span) = if self.match_token(&TokenKind::Extends) {
            let (parent, span) = self.expect_identifier()?;
            (Some(parent), Some(span))
        } else {
            (None, None)
        };

        self.expect(TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if !self.current().kind.can_start_member() {
                return Err(self.error_expected("member declaration"));
            }
            members.push(self.parse_member()?);
        }
        let end = self.expect(TokenKind::RBrace)?.span;

        Ok(ClassDecl {
            name,
            parent,
            members,
            name_span,
            parent_span,
            span: start.merge(end),
        })
    }

    fn parse_member(&mut self) -> CompileResult<Member> {
        let start = self.current().span;

        // Destructor: ~Name() block
        if self.match_token(&TokenKind::Tilde) {
            let (name, _) = self.expect_identifier()?;
            self.expect(TokenKind::LParen)?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_block()?;
            let span = start.merge(body.span);
            return Ok(Member::new(
                MemberKind::Destructor(DestructorDecl { name, body }),
                span,
            ));
        }

        // Constructor: Name(params) block
        if matches!(self.current().kind, TokenKind::Identifier(_))
            && matches!(self.peek_kind(1), TokenKind::LParen)
        {
            let (name, _) = self.expect_identifier()?;
            let params = self.parse_params()?;
            let body = self.parse_block()?;
            let span = start.merge(body.span);
            return Ok(Member::new(
                MemberKind::Constructor(ConstructorDecl { name, params, body }),
                span,
            ));
        }

        let mut is_static = false;
        let mut is_final = false;
        loop {
            if self.match_token(&TokenKind::Static) {
                is_static = true;
            } else if self.match_token(&TokenKind::Final) {
                is_final = true;
            } else {
                break;
            }
        }

        let return_type = if self.match_token(&TokenKind::Void) {
            None
        } else {
            Some(self.parse_type()?)
        };

        // Method: [static] T name(params) block
        if matches!(self.current().kind, TokenKind::Identifier(_))
            && matches!(self.peek_kind(1), TokenKind::LParen)
        {
            if is_final {
                return Err(CompileError::parser("methods cannot be final", start));
            }
            let (name, _) = self.expect_identifier()?;
            let params = self.parse_params()?;
            let body = self.parse_block()?;
            let span = start.merge(body.span);
            return Ok(Member::new(
                MemberKind::Method(MethodDecl {
                    is_static,
                    return_type,
                    name,
                    params,
                    body,
                }),
                span,
            ));
        }

        let Some(ty) = return_type else {
            return Err(CompileError::parser("attributes cannot be void", start));
        };
        let declarators = self.parse_declarators()?;
        let end = self.expect(TokenKind::Semi)?.span;
        Ok(Member::new(
            MemberKind::Attribute(AttributeDecl {
                is_static,
                is_final,
                ty,
                declarators,
            }),
            start.merge(end),
        ))
    }

    /// `(T a, b; U c)`
    fn parse_params(&mut self) -> CompileResult<Vec<Param>> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();

        if !self.check(&TokenKind::RParen) {
            loop {
                let ty = self.parse_type()?;
                loop {
                    let (name, span) = self.expect_identifier()?;
                    params.push(Param {
                        name,
                        ty: ty.clone(),
                        span,
                    });
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
                if !self.match_token(&TokenKind::Semi) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_declarators(&mut self) -> CompileResult<Vec<Declarator>> {
        let mut declarators = Vec::new();
        loop {
            let (name, name_span) = self.expect_identifier()?;
            let init = if self.match_token(&TokenKind::ColonEq) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            let span = init
                .as_ref()
                .map_or(name_span, |init| name_span.merge(init.span));
            declarators.push(Declarator {
                name,
                init,
                span,
            });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        Ok(declarators)
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> CompileResult<TypeExpr> {
        let token = self.current().clone();
        let kind = match token.kind {
            TokenKind::Int => TypeExprKind::Int,
            TokenKind::Float => TypeExprKind::Float,
            TokenKind::Boolean => TypeExprKind::Boolean,
            TokenKind::Str => TypeExprKind::String,
            TokenKind::Identifier(name) => TypeExprKind::Class(name),
            _ => return Err(self.error_expected("type")),
        };
        self.advance();
        let mut ty = TypeExpr::new(kind, token.span);

        while self.check(&TokenKind::LBracket) {
            self.advance();
            let size_token = self.advance();
            let size = match &size_token.kind {
                TokenKind::IntLiteral(text) => text.parse::<usize>().map_err(|_| {
                    CompileError::parser("array size out of range", size_token.span)
                })?,
                other => {
                    return Err(CompileError::parser(
                        format!("expected array size, found {}", other),
                        size_token.span,
                    ))
                }
            };
            let end = self.expect(TokenKind::RBracket)?.span;
            let span = ty.span.merge(end);
            ty = TypeExpr::array_of(ty, size, span);
        }

        if self.check(&TokenKind::Amp) {
            let end = self.advance().span;
            let span = ty.span.merge(end);
            ty = TypeExpr::reference_to(ty, span);
        }

        Ok(ty)
    }

    /// Whether the tokens at the cursor start a local declaration
    fn looks_like_declaration(&self) -> bool {
        match &self.current().kind {
            TokenKind::Final => true,
            kind if kind.is_primitive_type() => true,
            TokenKind::Identifier(_) => {
                let mut offset = 1;
                while matches!(self.peek_kind(offset), TokenKind::LBracket)
                    && matches!(self.peek_kind(offset + 1), TokenKind::IntLiteral(_))
                    && matches!(self.peek_kind(offset + 2), TokenKind::RBracket)
                {
                    offset += 3;
                }
                matches!(
                    self.peek_kind(offset),
                    TokenKind::Identifier(_) | TokenKind::Amp
                )
            }
            _ => false,
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> CompileResult<Block> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let mut stmts = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_statement()?);
        }

        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(Block::new(stmts, start.merge(end)))
    }

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        match &self.current().kind {
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(Stmt::new(StmtKind::Block(block), span))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Break => {
                let start = self.advance().span;
                let end = self.expect(TokenKind::Semi)?.span;
                Ok(Stmt::new(StmtKind::Break, start.merge(end)))
            }
            TokenKind::Continue => {
                let start = self.advance().span;
                let end = self.expect(TokenKind::Semi)?.span;
                Ok(Stmt::new(StmtKind::Continue, start.merge(end)))
            }
            TokenKind::Return => self.parse_return_statement(),
            _ if self.looks_like_declaration() => self.parse_var_decl(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_var_decl(&mut self) -> CompileResult<Stmt> {
        let start = self.current().span;
        let is_final = self.match_token(&TokenKind::Final);
        let ty = self.parse_type()?;
        let declarators = self.parse_declarators()?;
        let end = self.expect(TokenKind::Semi)?.span;

        Ok(Stmt::new(
            StmtKind::VarDecl(VarDecl {
                is_final,
                ty,
                declarators,
            }),
            start.merge(end),
        ))
    }

    fn parse_if_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::If)?.span;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Then)?;
        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        let span = start.merge(self.prev_span());
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn parse_for_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::For)?.span;
        let (var, var_span) = self.expect_identifier()?;
        self.expect(TokenKind::ColonEq)?;
        let from = self.parse_expression()?;

        let direction = if self.match_token(&TokenKind::To) {
            ForDirection::To
        } else if self.match_token(&TokenKind::Downto) {
            ForDirection::Downto
        } else {
            return Err(self.error_expected("'to' or 'downto'"));
        };

        let to = self.parse_expression()?;
        self.expect(TokenKind::Do)?;
        let body = Box::new(self.parse_statement()?);

        let span = start.merge(body.span);
        Ok(Stmt::new(
            StmtKind::For {
                var,
                var_span,
                start: from,
                end: to,
                direction,
                body,
            },
            span,
        ))
    }

    fn parse_return_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::Return)?.span;

        let value = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let end = self.expect(TokenKind::Semi)?.span;
        Ok(Stmt::new(StmtKind::Return(value), start.merge(end)))
    }

    /// Assignment or method-call statement
    fn parse_expression_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.current().span;
        let expr = self.parse_expression()?;

        if self.match_token(&TokenKind::ColonEq) {
            if !matches!(
                expr.kind,
                ExprKind::Identifier(_) | ExprKind::Field { .. } | ExprKind::Index { .. }
            ) {
                return Err(CompileError::parser("invalid assignment target", expr.span));
            }
            let value = self.parse_expression()?;
            let end = self.expect(TokenKind::Semi)?.span;
            return Ok(Stmt::new(
                StmtKind::Assign {
                    target: expr,
                    value,
                },
                start.merge(end),
            ));
        }

        if !matches!(expr.kind, ExprKind::MethodCall { .. }) {
            return Err(CompileError::parser(
                "expected assignment or method call statement",
                expr.span,
            ));
        }
        let end = self.expect(TokenKind::Semi)?.span;
        Ok(Stmt::new(StmtKind::Call(expr), start.merge(end)))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        self.parse_logical_or_expression()
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        let span = left.span.merge(right.span);
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    fn parse_logical_or_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_logical_and_expression()?;

        while self.match_token(&TokenKind::PipePipe) {
            let right = self.parse_logical_and_expression()?;
            left = Self::binary(BinaryOp::Or, left, right);
        }

        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_equality_expression()?;

        while self.match_token(&TokenKind::AmpAmp) {
            let right = self.parse_equality_expression()?;
            left = Self::binary(BinaryOp::And, left, right);
        }

        Ok(left)
    }

    fn parse_equality_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_relational_expression()?;

        loop {
            let op = match self.current().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational_expression()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_relational_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_concat_expression()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::GtEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_concat_expression()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_concat_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_additive_expression()?;

        while self.match_token(&TokenKind::Caret) {
            let right = self.parse_additive_expression()?;
            left = Self::binary(BinaryOp::Concat, left, right);
        }

        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative_expression()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Backslash => BinaryOp::IntDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary_expression()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> CompileResult<Expr> {
        let op = match self.current().kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_postfix_expression(),
        };
        let start = self.advance().span;
        let operand = self.parse_unary_expression()?;
        let span = start.merge(operand.span);

        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix_expression(&mut self) -> CompileResult<Expr> {
        let mut expr = self.parse_primary_expression()?;

        loop {
            if self.match_token(&TokenKind::Dot) {
                let (name, name_span) = self.expect_identifier()?;
                if self.check(&TokenKind::LParen) {
                    let args = self.parse_argument_list()?;
                    let span = expr.span.merge(self.prev_span());
                    expr = Expr::new(
                        ExprKind::MethodCall {
                            receiver: Box::new(expr),
                            method: name,
                            args,
                        },
                        span,
                    );
                } else {
                    let span = expr.span.merge(name_span);
                    expr = Expr::new(
                        ExprKind::Field {
                            object: Box::new(expr),
                            field: name,
                        },
                        span,
                    );
                }
            } else if self.match_token(&TokenKind::LBracket) {
                let index = self.parse_expression()?;
                let end = self.expect(TokenKind::RBracket)?.span;
                let span = expr.span.merge(end);
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_argument_list(&mut self) -> CompileResult<Vec<Expr>> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();

        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary_expression(&mut self) -> CompileResult<Expr> {
        let token = self.current().clone();
        let span = token.span;

        let kind = match token.kind {
            TokenKind::IntLiteral(text) => {
                self.advance();
                ExprKind::IntLiteral(self.parse_int_literal(&text, span)?)
            }
            TokenKind::FloatLiteral(text) => {
                self.advance();
                ExprKind::FloatLiteral(self.parse_float_literal(&text, span)?)
            }
            TokenKind::StringLiteral(text) => {
                self.advance();
                ExprKind::StringLiteral(self.parse_string_literal(&text, span)?)
            }
            TokenKind::True => {
                self.advance();
                ExprKind::BoolLiteral(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::BoolLiteral(false)
            }
            TokenKind::Nil => {
                self.advance();
                ExprKind::Nil
            }
            TokenKind::This => {
                self.advance();
                ExprKind::This
            }
            TokenKind::Identifier(name) => {
                self.advance();
                ExprKind::Identifier(name)
            }
            TokenKind::New => {
                self.advance();
                let (class, _) = self.expect_identifier()?;
                let args = self.parse_argument_list()?;
                return Ok(Expr::new(
                    ExprKind::New { class, args },
                    span.merge(self.prev_span()),
                ));
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                let end = self.expect(TokenKind::RParen)?.span;
                return Ok(Expr::new(ExprKind::Paren(Box::new(inner)), span.merge(end)));
            }
            TokenKind::LBrace => {
                self.advance();
                let mut elements = vec![self.parse_expression()?];
                while self.match_token(&TokenKind::Comma) {
                    elements.push(self.parse_expression()?);
                }
                let end = self.expect(TokenKind::RBrace)?.span;
                return Ok(Expr::new(ExprKind::ArrayLiteral(elements), span.merge(end)));
            }
            _ => return Err(self.error_expected("expression")),
        };

        Ok(Expr::new(kind, span))
    }

    // =========================================================================
    // Literal helpers
    // =========================================================================

    fn parse_int_literal(&self, s: &str, span: Span) -> CompileResult<i64> {
        s.parse::<i64>()
            .map_err(|_| CompileError::parser(format!("integer literal '{}' out of range", s), span))
    }

    fn parse_float_literal(&self, s: &str, span: Span) -> CompileResult<f64> {
        s.parse::<f64>()
            .map_err(|_| CompileError::parser(format!("invalid float literal '{}'", s), span))
    }

    fn parse_string_literal(&self, s: &str, span: Span) -> CompileResult<String> {
        let inner = s
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(|| CompileError::parser("malformed string literal", span))?;
        let mut result = String::with_capacity(inner.len());
        let mut chars = inner.chars();

        while let Some(c) = chars.next() {
            if c != '\\' {
                result.push(c);
                continue;
            }
            let escaped = match chars.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some('b') => '\u{8}',
                Some('f') => '\u{c}',
                Some('\\') => '\\',
                Some('"') => '"',
                Some(other) => {
                    return Err(CompileError::parser(
                        format!("unknown escape sequence '\\{}'", other),
                        span,
                    ))
                }
                None => return Err(CompileError::parser("dangling escape", span)),
            };
            result.push(escaped);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Program {
        Parser::new(source).unwrap().parse().unwrap()
    }

    fn parse_body(body: &str) -> Vec<Stmt> {
        let program = parse(&format!("class T {{ static void main() {{ {} }} }}", body));
        match &program.classes[0].members[0].kind {
            MemberKind::Method(method) => method.body.stmts.clone(),
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_class() {
        let program = parse("class A {} class B extends A {}");
        assert_eq!(program.classes.len(), 2);
        assert_eq!(program.classes[0].name, "A");
        assert_eq!(program.classes[1].parent.as_deref(), Some("A"));
    }

    #[test]
    fn test_parse_members() {
        let program = parse(
            "class P {
                static final int MAX := 10, MIN;
                float x;
                P(float x; int a, b) { this.x := x; }
                ~P() {}
                int get() { return 1; }
             }",
        );
        let members = &program.classes[0].members;
        assert_eq!(members.len(), 5);

        match &members[0].kind {
            MemberKind::Attribute(attr) => {
                assert!(attr.is_static && attr.is_final);
                assert_eq!(attr.declarators.len(), 2);
                assert!(attr.declarators[1].init.is_none());
            }
            other => panic!("expected attribute, got {:?}", other),
        }
        match &members[2].kind {
            MemberKind::Constructor(ctor) => {
                let names: Vec<_> = ctor.params.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["x", "a", "b"]);
                assert_eq!(ctor.params[2].ty.to_string(), "int");
            }
            other => panic!("expected constructor, got {:?}", other),
        }
        assert!(matches!(&members[3].kind, MemberKind::Destructor(d) if d.name == "P"));
        assert!(matches!(
            &members[4].kind,
            MemberKind::Method(m) if !m.is_static && m.return_type.is_some()
        ));
    }

    #[test]
    fn test_parse_types() {
        let program = parse("class A { int[3] xs; A& self; B[2][4] grid; }");
        let rendered: Vec<String> = program.classes[0]
            .members
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(rendered, vec!["int[3] xs", "A& self", "B[2][4] grid"]);
    }

    #[test]
    fn test_declaration_vs_assignment() {
        let stmts = parse_body("A a; A[2] b; a := nil; b[1] := a; int& r := x;");
        assert!(matches!(stmts[0].kind, StmtKind::VarDecl(_)));
        assert!(matches!(stmts[1].kind, StmtKind::VarDecl(_)));
        assert!(matches!(stmts[2].kind, StmtKind::Assign { .. }));
        assert!(matches!(stmts[3].kind, StmtKind::Assign { .. }));
        assert!(matches!(stmts[4].kind, StmtKind::VarDecl(_)));
    }

    #[test]
    fn test_precedence() {
        let stmts = parse_body("x := 1 + 2 * 3 > 4 && !b || c == d;");
        match &stmts[0].kind {
            StmtKind::Assign { value, .. } => {
                let ExprKind::Binary { op, left, .. } = &value.kind else {
                    panic!("expected binary")
                };
                assert_eq!(*op, BinaryOp::Or);
                assert!(matches!(&left.kind, ExprKind::Binary { op: BinaryOp::And, .. }));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_concat_binds_looser_than_additive() {
        let stmts = parse_body("s := \"a\" ^ \"b\" + c;");
        let StmtKind::Assign { value, .. } = &stmts[0].kind else {
            panic!("expected assignment")
        };
        assert!(matches!(&value.kind, ExprKind::Binary { op: BinaryOp::Concat, .. }));
    }

    #[test]
    fn test_control_flow() {
        let stmts = parse_body(
            "for i := 10 downto 0 do { if i == 5 then break; else continue; } return;",
        );
        assert_eq!(stmts.len(), 2);
        match &stmts[0].kind {
            StmtKind::For { var, direction, .. } => {
                assert_eq!(var, "i");
                assert_eq!(*direction, ForDirection::Downto);
            }
            other => panic!("expected for, got {:?}", other),
        }
        assert!(matches!(stmts[1].kind, StmtKind::Return(None)));
    }

    #[test]
    fn test_postfix_chain_and_rendering() {
        let stmts = parse_body("io.writeInt(this.items[i].size());");
        assert_eq!(stmts[0].to_string(), "io.writeInt(this.items[i].size())");
    }

    #[test]
    fn test_array_literal_and_new() {
        let stmts = parse_body("boolean[2] f := {true, 42}; p := new Point(1, 2.5);");
        assert_eq!(stmts[0].to_string(), "boolean[2] f:={true, 42}");
        assert_eq!(stmts[1].to_string(), "p:=new Point(1, 2.5)");
    }

    #[test]
    fn test_string_escapes() {
        let stmts = parse_body(r#"io.writeStr("a\tb\"c");"#);
        let StmtKind::Call(call) = &stmts[0].kind else {
            panic!("expected call")
        };
        let ExprKind::MethodCall { args, .. } = &call.kind else {
            panic!("expected method call")
        };
        assert!(matches!(&args[0].kind, ExprKind::StringLiteral(s) if s == "a\tb\"c"));
    }

    #[test]
    fn test_rejects_bare_expression_statement() {
        let result = Parser::new("class T { void m() { x + 1; } }")
            .unwrap()
            .parse();
        assert!(matches!(result, Err(CompileError::Parser { .. })));
    }

    #[test]
    fn test_rejects_empty_array_literal() {
        let result = Parser::new("class T { void m() { a := {}; } }")
            .unwrap()
            .parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_semicolon_reports_position() {
        let source = "class T { void m() { break } }";
        let err = Parser::new(source).unwrap().parse().unwrap_err();
        match err {
            CompileError::Parser { span, .. } => assert_eq!(&source[span.start..span.end], "}"),
            other => panic!("expected parser error, got {:?}", other),
        }
    }
}
