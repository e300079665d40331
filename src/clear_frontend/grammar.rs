use super::span::Span;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum PrefixOperator {
    Negate,
    LogicalNot,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    EqualTo,
    NotEqualTo,
    LessThan,
    GreaterThan,
    LessEq,
    GreaterEq,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum PostfixOperator {
    Increment,
    Decrement,
}

/// The whole parsed source. Module statements are hoisted out of the
/// statement list so the evaluator can process imports first.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub modules: Vec<ModuleImport>,
    pub is_empty: bool,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ModuleImport {
    pub name: Identifier,
    pub import_all: bool,
    pub imports: Vec<Identifier>,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Stmt {
    pub stmt: StmtKind,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum StmtKind {
    /// `let name = value;`; a missing initializer binds null.
    Let(Identifier, Option<Expr>),
    /// `name = value;`; the name must already be bound somewhere.
    Assign(Identifier, Expr),
    Return(Option<Expr>),
    Expression(Expr),
    Block(Vec<Stmt>),
    While(Expr, Vec<Stmt>),
    /// `for (init; condition; post) body` with all three headers required.
    For(Box<Stmt>, Expr, Expr, Vec<Stmt>),
    Break,
    Continue,
    /// `fn name(params) body`, sugar for a let of a function literal.
    Function(Identifier, Vec<Identifier>, Vec<Stmt>),
    Module(ModuleImport),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Expr {
    pub expr: ExprKind,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum ExprKind {
    Variable(Identifier),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Str(String),
    Prefix(PrefixOperator, Box<Expr>),
    Infix(InfixOperator, Box<Expr>, Box<Expr>),
    Postfix(PostfixOperator, Box<Expr>),
    If(Box<Expr>, Vec<Stmt>, Option<Vec<Stmt>>),
    FunctionLiteral(Vec<Identifier>, Vec<Stmt>),
    Call(Box<Expr>, Vec<Expr>),
    Array(Vec<Expr>),
    HashLiteral(Vec<(Expr, Expr)>),
    Index(Box<Expr>, Box<Expr>),
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: String, span: Span) -> Self {
        Identifier { name, span }
    }
}

impl Stmt {
    pub fn new(stmt: StmtKind, span: Span) -> Self {
        Stmt { stmt, span }
    }
}

impl Expr {
    pub fn new(expr: ExprKind, span: Span) -> Self {
        Expr { expr, span }
    }

    /// Prefix-notation rendering, used by tests and the AST dump.
    pub fn ast_string(&self) -> String {
        match &self.expr {
            ExprKind::Variable(var) => var.name.clone(),
            ExprKind::Integer(n) => n.to_string(),
            ExprKind::Float(n) => n.to_string(),
            ExprKind::Boolean(b) => b.to_string(),
            ExprKind::Str(s) => format!("\"{}\"", s),
            ExprKind::Prefix(op, rhs) => format!("({}{})", op.symbol(), rhs.ast_string()),
            ExprKind::Infix(op, lhs, rhs) => {
                format!("({} {} {})", lhs.ast_string(), op.symbol(), rhs.ast_string())
            }
            ExprKind::Postfix(op, lhs) => format!("({}{})", lhs.ast_string(), op.symbol()),
            ExprKind::If(condition, _, alternative) => {
                if alternative.is_some() {
                    format!("(if {} then else)", condition.ast_string())
                } else {
                    format!("(if {} then)", condition.ast_string())
                }
            }
            ExprKind::FunctionLiteral(params, _) => {
                let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
                format!("fn({})", names.join(", "))
            }
            ExprKind::Call(callee, args) => {
                let args: Vec<String> = args.iter().map(|a| a.ast_string()).collect();
                format!("{}({})", callee.ast_string(), args.join(", "))
            }
            ExprKind::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(|e| e.ast_string()).collect();
                format!("[{}]", elements.join(", "))
            }
            ExprKind::HashLiteral(pairs) => {
                let pairs: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.ast_string(), v.ast_string()))
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
            ExprKind::Index(collection, key) => {
                format!("({}[{}])", collection.ast_string(), key.ast_string())
            }
        }
    }
}

impl PrefixOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            PrefixOperator::Negate => "-",
            PrefixOperator::LogicalNot => "!",
        }
    }
}

impl InfixOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::EqualTo => "==",
            InfixOperator::NotEqualTo => "!=",
            InfixOperator::LessThan => "<",
            InfixOperator::GreaterThan => ">",
            InfixOperator::LessEq => "<=",
            InfixOperator::GreaterEq => ">=",
            InfixOperator::AddAssign => "+=",
            InfixOperator::SubAssign => "-=",
            InfixOperator::MulAssign => "*=",
            InfixOperator::DivAssign => "/=",
        }
    }

    /// Compound operators also write the result back to the environment.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            InfixOperator::AddAssign
                | InfixOperator::SubAssign
                | InfixOperator::MulAssign
                | InfixOperator::DivAssign
        )
    }

    /// The arithmetic underlying a compound operator.
    pub fn base_op(&self) -> InfixOperator {
        match self {
            InfixOperator::AddAssign => InfixOperator::Add,
            InfixOperator::SubAssign => InfixOperator::Subtract,
            InfixOperator::MulAssign => InfixOperator::Multiply,
            InfixOperator::DivAssign => InfixOperator::Divide,
            other => *other,
        }
    }
}

impl PostfixOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            PostfixOperator::Increment => "++",
            PostfixOperator::Decrement => "--",
        }
    }
}
