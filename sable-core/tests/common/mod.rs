//! 测试辅助工具
//!
//! 提供分词与解析的辅助函数

#![allow(dead_code)]

use sable_core::compiler::lexer::builder::build_lexer;
use sable_core::compiler::parser::{parse_source, Block, ParserError};
use sable_core::{LexerConfig, ParserConfig, Token, TokenKind};

/// 分词到 EOF（含），遇到致命错误时 panic
pub fn lex(code: &str) -> Vec<Token> {
    build_lexer(code)
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| panic!("lexer failed on {code:?}: {e}"))
}

pub fn lex_kinds(code: &str) -> Vec<TokenKind> {
    lex(code).into_iter().map(|t| t.kind).collect()
}

pub fn count(kinds: &[TokenKind], kind: TokenKind) -> usize {
    kinds.iter().filter(|k| **k == kind).count()
}

/// 解析并返回 AST 与记录的错误
pub fn parse(code: &str) -> (Block, Vec<ParserError>) {
    parse_source(code, &LexerConfig::default(), ParserConfig::default())
        .unwrap_or_else(|e| panic!("parse aborted on {code:?}: {e}"))
}

/// 解析，要求没有任何错误
pub fn parse_ok(code: &str) -> Block {
    let (block, errors) = parse(code);
    assert!(errors.is_empty(), "unexpected errors in {code:?}: {errors:?}");
    block
}

/// 把 AST 按语句渲染成文本，便于整体比较
pub fn render(block: &Block) -> String {
    block.iter().map(|s| s.to_string()).collect()
}
