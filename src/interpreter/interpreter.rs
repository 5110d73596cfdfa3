use super::environment::{Environment, ScopeId};
use super::errors::{RuntimeErrorKind, RuntimeResult};
use super::value::RuntimeVal;
use crate::error::Error;
use crate::frontend::grammar::{BinaryOperator, Expr, ExprType};
use crate::frontend::grammar::{Program, Stmt, StmtType, VarDeclaration};
use crate::frontend::{parse, tokenize};

/// Tree-walking evaluator together with the environment it mutates.
///
/// The same interpreter can run several sources in a row; declarations made
/// by one run stay visible to the next.
pub struct Interpreter {
    env: Environment,
    scope: ScopeId,
}

impl Interpreter {
    pub fn new() -> Self {
        let env = Environment::with_globals();
        let scope = env.root();
        Interpreter { env, scope }
    }

    /// Lexes, parses and evaluates `source`, returning the value of its last statement.
    pub fn run(&mut self, source: &str) -> Result<RuntimeVal, Error> {
        let result = tokenize(source)
            .map_err(Error::from)
            .and_then(|tokens| parse(tokens).map_err(Error::from))
            .and_then(|program| self.eval_program(&program).map_err(Error::from));

        if let Err(err) = &result {
            tracing::debug!(category = %err.category(), error = %err, "run aborted");
        }
        result
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Reads a binding visible from the root scope.
    pub fn get_global(&self, name: &str) -> Option<RuntimeVal> {
        self.env.lookup(self.env.root(), name).ok()
    }

    pub fn eval_program(&mut self, program: &Program) -> RuntimeResult<RuntimeVal> {
        let mut last_evaluated = RuntimeVal::Null;
        for stmt in program.body.iter() {
            last_evaluated = self.eval_statement(stmt)?;
        }
        Ok(last_evaluated)
    }

    pub fn eval_statement(&mut self, stmt: &Stmt) -> RuntimeResult<RuntimeVal> {
        #[cfg(feature = "trace-execution")]
        tracing::trace!(stmt = %stmt.ast_string(), "evaluating");

        match &stmt.stmt {
            StmtType::Expression(expr) => self.eval_expression(expr),
            StmtType::VarDeclaration(decl) => self.eval_var_declaration(decl),
        }
    }

    fn eval_var_declaration(&mut self, decl: &VarDeclaration) -> RuntimeResult<RuntimeVal> {
        let value = match &decl.value {
            Some(expr) => self.eval_expression(expr)?,
            None => RuntimeVal::Null,
        };

        let ident = &decl.identifier;
        self.env
            .declare(self.scope, &ident.symbol, value, decl.constant)
            .map_err(|kind| kind.at(ident.span))
    }

    pub fn eval_expression(&mut self, expr: &Expr) -> RuntimeResult<RuntimeVal> {
        match &expr.expr {
            ExprType::NumericLiteral(n) => Ok(RuntimeVal::Number(*n)),
            ExprType::Identifier(ident) => self
                .env
                .lookup(self.scope, &ident.symbol)
                .map_err(|kind| kind.at(ident.span)),
            ExprType::Binary(op, lhs, rhs) => self.eval_binary_expr(*op, lhs, rhs, expr),
            ExprType::Assignment(target, value) => self.eval_assignment(target, value, expr),
        }
    }

    /// Both sides are always evaluated, left first.
    fn eval_binary_expr(
        &mut self,
        op: BinaryOperator,
        lhs: &Expr,
        rhs: &Expr,
        expr: &Expr,
    ) -> RuntimeResult<RuntimeVal> {
        let lhs = self.eval_expression(lhs)?;
        let rhs = self.eval_expression(rhs)?;
        RuntimeVal::apply_binary_op(op, lhs, rhs).map_err(|kind| kind.at(expr.span))
    }

    fn eval_assignment(
        &mut self,
        target: &Expr,
        value: &Expr,
        expr: &Expr,
    ) -> RuntimeResult<RuntimeVal> {
        let name = match &target.expr {
            ExprType::Identifier(ident) => &ident.symbol,
            _ => {
                let kind = RuntimeErrorKind::InvalidAssignmentTarget(target.ast_string());
                return Err(kind.at(target.span));
            }
        };

        let value = self.eval_expression(value)?;
        self.env
            .assign(self.scope, name, value)
            .map_err(|kind| kind.at(expr.span))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
