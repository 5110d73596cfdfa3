use super::value::RuntimeVal;
use crate::frontend::grammar::BinaryOperator;
use crate::frontend::span::Span;

use thiserror::Error;

#[derive(Debug, PartialEq, Clone, Error)]
pub enum RuntimeErrorKind {
    #[error("Cannot resolve `{0}` as it does not exist")]
    UnresolvedIdentifier(String),
    #[error("Cannot reassign `{0}` as it was declared constant")]
    ConstantReassignment(String),
    #[error("Cannot declare `{0}` as it is already defined in this scope")]
    DuplicateDeclaration(String),
    #[error("Cannot assign to `{0}`, only identifiers are assignable")]
    InvalidAssignmentTarget(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Cannot apply `{}` to {} and {}", .0.symbol(), .1.type_name(), .2.type_name())]
    InvalidOperands(BinaryOperator, RuntimeVal, RuntimeVal),
}

#[derive(Debug, PartialEq, Clone, Error)]
#[error("{kind} at {}", .span.start_pos)]
pub struct RuntimeError {
    pub span: Span,
    pub kind: RuntimeErrorKind,
}

/// Result of scope-chain and value operations, which know nothing about spans.
pub type EnvResult<T> = Result<T, RuntimeErrorKind>;
pub type RuntimeResult<T> = Result<T, RuntimeError>;

impl RuntimeErrorKind {
    pub fn at(self, span: Span) -> RuntimeError {
        RuntimeError { span, kind: self }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuntimeErrorKind::UnresolvedIdentifier(_) => "UnresolvedIdentifier",
            RuntimeErrorKind::ConstantReassignment(_) => "ConstantReassignment",
            RuntimeErrorKind::DuplicateDeclaration(_) => "DuplicateDeclaration",
            RuntimeErrorKind::InvalidAssignmentTarget(_) => "InvalidAssignmentTarget",
            RuntimeErrorKind::DivisionByZero => "DivisionByZero",
            RuntimeErrorKind::InvalidOperands(..) => "InvalidOperands",
        }
    }
}
