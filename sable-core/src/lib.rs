//! Sable Core - 语言前端（纯逻辑，无 IO）
//!
//! 包含词法分析器与语法分析器，只操作内存中的数据结构，
//! 不做文件 IO 或终端输出。
//!
//! 配置通过参数显式传递，不依赖全局状态。

pub mod compiler;
pub mod kit;

// 常用类型重导出
pub use compiler::lexer::token::{Token, TokenValue};
pub use compiler::lexer::token_kind::TokenKind;
pub use compiler::parser::{Block, Parser, ParserError, ParserErrorKind};
pub use kit::lexer::{LexErrorKind, Lexer, LexerError, SourcePosition};

// 配置类型重导出
pub use sable_config::{LexerConfig, ParserConfig, Phase};
