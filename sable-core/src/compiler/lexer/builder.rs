//! Lexer 构建器

use crate::kit::lexer::{CharStream, Lexer, StreamError};
use sable_config::LexerConfig;

/// 使用默认配置创建 Lexer
pub fn build_lexer(source: &str) -> Lexer {
    build_lexer_with_config(source, &LexerConfig::default())
}

pub fn build_lexer_with_config(source: &str, config: &LexerConfig) -> Lexer {
    Lexer::new(CharStream::new(source), config)
}

/// 从字节创建，要求合法 UTF-8
pub fn build_lexer_from_bytes(bytes: &[u8], config: &LexerConfig) -> Result<Lexer, StreamError> {
    Ok(Lexer::new(CharStream::from_bytes(bytes)?, config))
}
