//! 测试辅助工具
//!
//! 提供端到端测试的辅助函数

#![allow(dead_code)]

use sable_workspace::{parse, tokenize, ParseOutput, RunConfig, SableError, TokenKind};

/// 使用默认配置解析
pub fn parse_code(code: &str) -> Result<ParseOutput, SableError> {
    parse(code, &RunConfig::default())
}

/// 解析并要求没有错误，返回源码风格的 AST 文本
pub fn parse_clean(code: &str) -> String {
    let output = parse_code(code).unwrap_or_else(|e| panic!("parse aborted: {e}"));
    assert!(output.is_clean(), "unexpected errors: {:?}", output.errors);
    output.block.iter().map(|s| s.to_string()).collect()
}

pub fn token_kinds(code: &str) -> Vec<TokenKind> {
    tokenize(code, &RunConfig::default())
        .unwrap_or_else(|e| panic!("tokenize failed: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

/// 读取 demos/ 下的示例程序
pub fn demo(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}
