use super::errors::{ParserError, ParserErrorType, ParserResult, MAX_DEPTH, MAX_NESTING};
use super::grammar::{BinaryOperator, Expr, ExprType, Identifier, Program};
use super::grammar::{Stmt, StmtType, VarDeclaration};
use super::span::Span;
use super::token::{Token, TokenKind};

/// Recursive descent parser with one stage per precedence level.
///
/// Precedence, lowest first: assignment (right-associative), additive,
/// multiplicative (both left-associative), primary.
pub struct Parser {
    tokens: std::vec::IntoIter<Token>,
    current: Token,
    previous: Token,
    nesting: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens.into_iter();
        let current = tokens
            .next()
            .unwrap_or_else(|| Token::end_of_file(Span::default()));

        Parser {
            tokens,
            previous: current.clone(),
            current,
            nesting: 0,
        }
    }

    /// Advances the stream. Once the tokens run out the parser stays on EndOfFile.
    fn bump(&mut self) {
        let next = match self.tokens.next() {
            Some(token) => token,
            None => Token::end_of_file(Span::point(self.current.span.end_pos)),
        };
        self.previous = std::mem::replace(&mut self.current, next);
    }

    /// Checks whether or not the current token is of the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    /// If the current token is of the given kind consume it and return true,
    /// else return false.
    fn check_consume(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            return true;
        }
        false
    }

    /// Consumes and returns the current token, asserting its kind.
    fn consume(&mut self, expected: TokenKind) -> ParserResult<Token> {
        if self.check(expected) {
            self.bump();
            Ok(self.previous.clone())
        } else {
            Err(self.expected_token(expected))
        }
    }

    fn expected_token(&self, expected: TokenKind) -> ParserError {
        ParserError::new(
            ParserErrorType::ExpectedToken {
                expected,
                found: self.current.clone(),
            },
            self.current.span,
        )
    }

    /// Parses the whole token stream into a program.
    pub fn parse(mut self) -> ParserResult<Program> {
        let mut body = vec![];

        while !self.check(TokenKind::EndOfFile) {
            body.push(self.parse_statement()?);
        }

        tracing::debug!(statements = body.len(), "parsed program");
        Ok(Program::new(body))
    }

    fn parse_statement(&mut self) -> ParserResult<Stmt> {
        let curr_span = self.current.span;

        let stmt_type = match self.current.kind {
            TokenKind::Let | TokenKind::Const => self.parse_var_declaration()?,
            _ => self.parse_expression_statement()?,
        };

        Ok(Stmt::new(stmt_type, curr_span.extend(self.previous.span)))
    }

    fn parse_var_declaration(&mut self) -> ParserResult<StmtType> {
        let keyword_span = self.current.span;
        let constant = self.check(TokenKind::Const);
        self.bump();

        let name = self.consume(TokenKind::Identifier)?;
        let identifier = Identifier::new(name.text, name.span);

        let value = if self.check_consume(TokenKind::Semicolon) {
            if constant {
                return Err(ParserError::new(
                    ParserErrorType::UninitializedConstant(identifier.symbol),
                    keyword_span.extend(self.previous.span),
                ));
            }
            None
        } else {
            self.consume(TokenKind::Equals)?;
            let value = self.parse_expression()?;
            self.consume(TokenKind::Semicolon)?;
            Some(value)
        };

        Ok(StmtType::VarDeclaration(VarDeclaration {
            identifier,
            constant,
            value,
        }))
    }

    /// The closing `;` may only be left out on the last statement of the source.
    fn parse_expression_statement(&mut self) -> ParserResult<StmtType> {
        let expr = self.parse_expression()?;

        if !self.check_consume(TokenKind::Semicolon) && !self.check(TokenKind::EndOfFile) {
            return Err(self.expected_token(TokenKind::Semicolon));
        }

        Ok(StmtType::Expression(expr))
    }

    pub fn parse_expression(&mut self) -> ParserResult<Expr> {
        self.parse_assignment()
    }

    /// Every parenthesised group and every chained `=` passes through here, so this is
    /// where descent is bounded.
    fn parse_assignment(&mut self) -> ParserResult<Expr> {
        if self.nesting == MAX_NESTING {
            return Err(ParserError::new(
                ParserErrorType::NestingTooDeep(MAX_NESTING),
                self.current.span,
            ));
        }

        self.nesting += 1;
        let result = self.parse_assignment_inner();
        self.nesting -= 1;
        result
    }

    fn parse_assignment_inner(&mut self) -> ParserResult<Expr> {
        let target = self.parse_additive()?;

        if self.check_consume(TokenKind::Equals) {
            let value = self.parse_assignment()?;
            let span = target.span.extend(value.span);
            return bounded(Expr::new(
                ExprType::Assignment(Box::new(target), Box::new(value)),
                span,
            ));
        }

        Ok(target)
    }

    fn parse_additive(&mut self) -> ParserResult<Expr> {
        let mut lhs = self.parse_multiplicative()?;

        while let Some(op) = self.peek_operator(BinaryOperator::is_additive) {
            self.bump();
            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> ParserResult<Expr> {
        let mut lhs = self.parse_primary()?;

        while let Some(op) = self.peek_operator(BinaryOperator::is_multiplicative) {
            self.bump();
            let rhs = self.parse_primary()?;
            lhs = binary(op, lhs, rhs)?;
        }

        Ok(lhs)
    }

    /// Returns the operator under the cursor if it belongs to the given stage.
    fn peek_operator(&self, stage: fn(&BinaryOperator) -> bool) -> Option<BinaryOperator> {
        if !self.check(TokenKind::BinaryOperator) {
            return None;
        }
        BinaryOperator::from_symbol(&self.current.text).filter(stage)
    }

    fn parse_primary(&mut self) -> ParserResult<Expr> {
        let curr_span = self.current.span;

        let expr = match self.current.kind {
            TokenKind::Identifier => {
                self.bump();
                let ident = Identifier::new(self.previous.text.clone(), curr_span);
                ExprType::Identifier(ident)
            }
            TokenKind::Number => {
                let value = match self.current.text.parse() {
                    Ok(value) => value,
                    Err(_) => return Err(self.expected_expr()),
                };
                self.bump();
                ExprType::NumericLiteral(value)
            }
            TokenKind::OpenParen => {
                self.bump();
                let sub_expr = self.parse_expression()?;
                self.consume(TokenKind::CloseParen)?;
                return Ok(sub_expr);
            }
            _ => return Err(self.expected_expr()),
        };

        Ok(Expr::new(expr, curr_span))
    }

    fn expected_expr(&self) -> ParserError {
        ParserError::new(
            ParserErrorType::ExpectedExpr(self.current.clone()),
            self.current.span,
        )
    }
}

fn binary(op: BinaryOperator, lhs: Expr, rhs: Expr) -> ParserResult<Expr> {
    let span = lhs.span.extend(rhs.span);
    bounded(Expr::new(ExprType::Binary(op, Box::new(lhs), Box::new(rhs)), span))
}

/// Rejects trees the evaluator could not walk without exhausting the stack.
fn bounded(expr: Expr) -> ParserResult<Expr> {
    if expr.depth() > MAX_DEPTH {
        return Err(ParserError::new(
            ParserErrorType::NestingTooDeep(MAX_DEPTH),
            expr.span,
        ));
    }
    Ok(expr)
}

/// Parses a token stream produced by the lexer.
pub fn parse(tokens: Vec<Token>) -> ParserResult<Program> {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::tokenize;

    fn parse_source(source: &str) -> ParserResult<Program> {
        parse(tokenize(source).unwrap())
    }

    fn ast(source: &str) -> String {
        parse_source(source).unwrap().ast_string()
    }

    fn error(source: &str) -> ParserErrorType {
        parse_source(source).unwrap_err().error
    }

    #[test]
    fn test_var_declaration() {
        let program = parse_source("let x = 1 + 2;").unwrap();
        assert_eq!(program.body.len(), 1);

        let decl = match &program.body[0].stmt {
            StmtType::VarDeclaration(decl) => decl,
            other => panic!("expected declaration, got {:?}", other),
        };
        assert_eq!(decl.identifier.symbol, "x");
        assert!(!decl.constant);

        let value = decl.value.as_ref().unwrap();
        match &value.expr {
            ExprType::Binary(BinaryOperator::Add, lhs, rhs) => {
                assert_eq!(lhs.expr, ExprType::NumericLiteral(1.0));
                assert_eq!(rhs.expr, ExprType::NumericLiteral(2.0));
            }
            other => panic!("expected addition, got {:?}", other),
        }
        assert_eq!(
            value.span.extract_string("let x = 1 + 2;"),
            Some("1 + 2")
        );
    }

    #[test]
    fn test_declarations() {
        assert_eq!(ast("let x;"), "(let x)");
        assert_eq!(ast("const y = 4;"), "(const y 4)");
        assert_eq!(ast("let a = 1; let b = a;"), "(let a 1)\n(let b a)");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(ast("1 + 2 * 3;"), "(+ 1 (* 2 3))");
        assert_eq!(ast("3 + 99 * 20 - 5;"), "(- (+ 3 (* 99 20)) 5)");
        assert_eq!(ast("(1 + 2) * 3;"), "(* (+ 1 2) 3)");
        assert_eq!(ast("8 % 3 / 2;"), "(/ (% 8 3) 2)");
    }

    #[test]
    fn test_associativity() {
        assert_eq!(ast("10 - 3 - 2;"), "(- (- 10 3) 2)");
        assert_eq!(ast("a = b = 3;"), "(= a (= b 3))");
        assert_eq!(ast("x = x + 1;"), "(= x (+ x 1))");
    }

    #[test]
    fn test_assignment_target_is_not_checked() {
        assert_eq!(ast("1 + 2 = 3;"), "(= (+ 1 2) 3)");
        assert_eq!(ast("(x) = 3;"), "(= x 3)");
    }

    #[test]
    fn test_trailing_semicolon_optional_at_end() {
        assert_eq!(ast("let x = 2; x"), "(let x 2)\nx");
        assert_eq!(ast(""), "");
        assert_eq!(ast(" \n\t"), "");
    }

    #[test]
    fn test_missing_close_paren() {
        match error("(1 + 2;") {
            ParserErrorType::ExpectedToken { expected, found } => {
                assert_eq!(expected, TokenKind::CloseParen);
                assert_eq!(found.kind, TokenKind::Semicolon);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        match error("let x = 1") {
            ParserErrorType::ExpectedToken { expected, found } => {
                assert_eq!(expected, TokenKind::Semicolon);
                assert_eq!(found.kind, TokenKind::EndOfFile);
            }
            other => panic!("unexpected error {:?}", other),
        }

        match error("1 2;") {
            ParserErrorType::ExpectedToken { expected, found } => {
                assert_eq!(expected, TokenKind::Semicolon);
                assert_eq!(found.text, "2");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_declaration_errors() {
        assert_eq!(
            error("const y;"),
            ParserErrorType::UninitializedConstant("y".to_owned())
        );

        match error("let 5 = 1;") {
            ParserErrorType::ExpectedToken { expected, .. } => {
                assert_eq!(expected, TokenKind::Identifier)
            }
            other => panic!("unexpected error {:?}", other),
        }

        match error("let x 5;") {
            ParserErrorType::ExpectedToken { expected, .. } => {
                assert_eq!(expected, TokenKind::Equals)
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_expected_expression() {
        match error(") + 1;") {
            ParserErrorType::ExpectedExpr(found) => assert_eq!(found.kind, TokenKind::CloseParen),
            other => panic!("unexpected error {:?}", other),
        }

        match error("1 + ;") {
            ParserErrorType::ExpectedExpr(found) => assert_eq!(found.kind, TokenKind::Semicolon),
            other => panic!("unexpected error {:?}", other),
        }

        let err = parse_source("let x = 1;\nlet y = *;").unwrap_err();
        assert_eq!(err.span.start_pos.line_no, 2);
        assert_eq!(err.span.start_pos.column_no, 9);
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{};", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(ast(&nested(100)), "1");
        assert!(parse_source(&nested(MAX_NESTING - 1)).is_ok());
        assert_eq!(
            error(&nested(MAX_NESTING)),
            ParserErrorType::NestingTooDeep(MAX_NESTING)
        );
        assert_eq!(
            error(&nested(300)),
            ParserErrorType::NestingTooDeep(MAX_NESTING)
        );

        let chained = format!("{}1;", "a = ".repeat(MAX_NESTING));
        assert_eq!(error(&chained), ParserErrorType::NestingTooDeep(MAX_NESTING));
    }

    #[test]
    fn test_depth_limit() {
        let sum = |terms: usize| format!("{}1;", "1 + ".repeat(terms - 1));

        let program = parse_source(&sum(MAX_DEPTH)).unwrap();
        match &program.body[0].stmt {
            StmtType::Expression(expr) => assert_eq!(expr.depth(), MAX_DEPTH),
            other => panic!("expected expression, got {:?}", other),
        }

        assert_eq!(
            error(&sum(MAX_DEPTH + 1)),
            ParserErrorType::NestingTooDeep(MAX_DEPTH)
        );
        assert_eq!(
            error(&format!("{}1;", "2 * ".repeat(5000))),
            ParserErrorType::NestingTooDeep(MAX_DEPTH)
        );
    }
}
