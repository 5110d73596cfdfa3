use super::span::Span;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

/// Root of a parsed source. Never modified after parsing.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Stmt {
    pub stmt: StmtType,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub enum StmtType {
    VarDeclaration(VarDeclaration),
    Expression(Expr),
}

#[derive(Debug, PartialEq, Clone)]
pub struct VarDeclaration {
    pub identifier: Identifier,
    pub constant: bool,
    pub value: Option<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Expr {
    pub expr: ExprType,
    pub span: Span,
    depth: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExprType {
    /// Target is kept as parsed; whether it is assignable is checked at evaluation.
    Assignment(Box<Expr>, Box<Expr>),
    Binary(BinaryOperator, Box<Expr>, Box<Expr>),
    Identifier(Identifier),
    NumericLiteral(f64),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Identifier {
    pub symbol: String,
    pub span: Span,
}

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<BinaryOperator> {
        let op = match symbol {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Subtract,
            "*" => BinaryOperator::Multiply,
            "/" => BinaryOperator::Divide,
            "%" => BinaryOperator::Remainder,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
        }
    }

    pub fn is_additive(&self) -> bool {
        matches!(self, BinaryOperator::Add | BinaryOperator::Subtract)
    }

    pub fn is_multiplicative(&self) -> bool {
        !self.is_additive()
    }
}

impl Identifier {
    pub fn new(symbol: impl Into<String>, span: Span) -> Self {
        Identifier {
            symbol: symbol.into(),
            span,
        }
    }
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body }
    }

    pub fn ast_string(&self) -> String {
        let stmts: Vec<_> = self.body.iter().map(|s| s.ast_string()).collect();
        stmts.join("\n")
    }
}

impl Stmt {
    pub fn new(stmt: StmtType, span: Span) -> Self {
        Stmt { stmt, span }
    }

    pub fn ast_string(&self) -> String {
        match &self.stmt {
            StmtType::Expression(expr) => expr.ast_string(),
            StmtType::VarDeclaration(decl) => {
                let keyword = if decl.constant { "const" } else { "let" };
                match &decl.value {
                    Some(value) => format!(
                        "({} {} {})",
                        keyword,
                        decl.identifier.symbol,
                        value.ast_string()
                    ),
                    None => format!("({} {})", keyword, decl.identifier.symbol),
                }
            }
        }
    }
}

impl Expr {
    pub fn new(expr: ExprType, span: Span) -> Self {
        let depth = match &expr {
            ExprType::Assignment(lhs, rhs) | ExprType::Binary(_, lhs, rhs) => {
                1 + lhs.depth.max(rhs.depth)
            }
            ExprType::Identifier(_) | ExprType::NumericLiteral(_) => 1,
        };
        Expr { expr, span, depth }
    }

    /// Number of nodes on the longest path from this node down to a leaf.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn ast_string(&self) -> String {
        match &self.expr {
            ExprType::NumericLiteral(n) => n.to_string(),
            ExprType::Identifier(ident) => ident.symbol.clone(),
            ExprType::Binary(op, lhs, rhs) => format!(
                "({} {} {})",
                op.symbol(),
                lhs.ast_string(),
                rhs.ast_string()
            ),
            ExprType::Assignment(target, value) => {
                format!("(= {} {})", target.ast_string(), value.ast_string())
            }
        }
    }
}
