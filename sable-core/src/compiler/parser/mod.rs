pub mod error;
pub mod expr;
pub mod parser;
pub mod stmt;
mod utils;

// 重新导出常用类型
pub use error::{ParseResult, ParserError, ParserErrorKind};
pub use expr::{Binary, BinaryKind, BinaryOp, Expr, ExprKind, Identifier, Literal, Unary, UnaryOp};
pub use parser::{parse_source, Parser};
pub use stmt::{Block, Branch, ElseBlock, Function, FunctionDecl, Stmt, StmtKind};
