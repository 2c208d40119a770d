//! 通用工具：字符流、位置追踪、词法状态机
pub mod lexer;
