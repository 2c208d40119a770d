//! Sable Lexer
//!
//! 基于显式状态机的词法分析器：
//! - 单一 match 循环驱动所有状态，无动态分发
//! - 缩进栈生成 Indent/Dedent，括号内暂停缩进追踪
//! - 可恢复的词法错误以 Error token 形式输出
//! - 只有缩进失配是致命错误

pub mod context;
pub mod core;
pub mod error;
pub mod lexer;
pub mod scanner;

pub use context::LexContext;
pub use core::{CharStream, SourcePosition, StreamError};
pub use error::{LexErrorKind, LexerError};
pub use lexer::{Lexer, TokenSource};
pub use scanner::{LexState, Scanner};
