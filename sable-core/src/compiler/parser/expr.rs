use crate::compiler::lexer::token_kind::TokenKind;
use crate::kit::lexer::SourcePosition;
use serde::Serialize;
use std::fmt;

// 表达式类型别名
pub type Expr = Box<ExprKind>;

/// 表达式
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(Identifier),
    Unary(Unary),
    Binary(Binary),
    Call(Call),
    FieldAccess(FieldAccess),
    Subscript(Subscript),
}

/// 字面量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

/// 标识符，也用于函数名、参数名、类型名
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// `-x`
    Negate,
    /// `not x`
    Not,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unary {
    pub op: UnaryOp,
    pub operand: Expr,
}

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// 二元表达式的分类：形状相同，优先级不同
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum BinaryKind {
    Assignment,
    Logical,
    Comparison,
    Sum,
    Product,
    Power,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Assignment => BinaryOp::Assign,
            TokenKind::PlusAssign => BinaryOp::AddAssign,
            TokenKind::MinusAssign => BinaryOp::SubAssign,
            TokenKind::MultiplyAssign => BinaryOp::MulAssign,
            TokenKind::DivideAssign => BinaryOp::DivAssign,
            TokenKind::ModuloAssign => BinaryOp::ModAssign,
            TokenKind::ExponentAssign => BinaryOp::PowAssign,
            TokenKind::Or => BinaryOp::Or,
            TokenKind::And => BinaryOp::And,
            TokenKind::Equal => BinaryOp::Eq,
            TokenKind::NotEqual => BinaryOp::Ne,
            TokenKind::LessThan => BinaryOp::Lt,
            TokenKind::GreaterThan => BinaryOp::Gt,
            TokenKind::LessThanOrEqual => BinaryOp::Le,
            TokenKind::GreaterThanOrEqual => BinaryOp::Ge,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Multiply => BinaryOp::Mul,
            TokenKind::Divide => BinaryOp::Div,
            TokenKind::Modulo => BinaryOp::Mod,
            TokenKind::Exponent => BinaryOp::Pow,
            _ => return None,
        })
    }

    pub fn kind(&self) -> BinaryKind {
        match self {
            BinaryOp::Assign
            | BinaryOp::AddAssign
            | BinaryOp::SubAssign
            | BinaryOp::MulAssign
            | BinaryOp::DivAssign
            | BinaryOp::ModAssign
            | BinaryOp::PowAssign => BinaryKind::Assignment,
            BinaryOp::Or | BinaryOp::And => BinaryKind::Logical,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => {
                BinaryKind::Comparison
            }
            BinaryOp::Add | BinaryOp::Sub => BinaryKind::Sum,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => BinaryKind::Product,
            BinaryOp::Pow => BinaryKind::Power,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::ModAssign => "%=",
            BinaryOp::PowAssign => "**=",
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binary {
    pub left: Expr,
    pub op: BinaryOp,
    pub right: Expr,
}

impl Binary {
    pub fn kind(&self) -> BinaryKind {
        self.op.kind()
    }
}

// 函数调用 `callee(arguments...)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub callee: Expr,
    pub arguments: Vec<Expr>,
}

// 字段访问 `object.field`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldAccess {
    pub object: Expr,
    pub field: Identifier,
}

// 下标访问 `object[index]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscript {
    pub object: Expr,
    pub index: Expr,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::Boolean(v) => write!(f, "{v}"),
            Literal::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Identifier(id) => write!(f, "{}", id.name),
            ExprKind::Unary(un) => match un.op {
                UnaryOp::Negate => write!(f, "(-{})", un.operand),
                UnaryOp::Not => write!(f, "(not {})", un.operand),
            },
            ExprKind::Binary(bin) => {
                write!(f, "({} {} {})", bin.left, bin.op.symbol(), bin.right)
            }
            ExprKind::Call(call) => {
                let args = call
                    .arguments
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}({})", call.callee, args)
            }
            ExprKind::FieldAccess(access) => write!(f, "{}.{}", access.object, access.field.name),
            ExprKind::Subscript(sub) => write!(f, "{}[{}]", sub.object, sub.index),
        }
    }
}
