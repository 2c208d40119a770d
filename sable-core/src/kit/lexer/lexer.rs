//! Lexer 主入口
//!
//! 包装 `Scanner` 状态机，对外提供拉取式接口：
//! - `next_token()`：解析器按需拉取，每次一个 token
//! - `Iterator`：产出到 EOF（含）为止
//!
//! # 示例
//!
//! ```rust
//! use sable_core::kit::lexer::Lexer;
//! use sable_core::TokenKind;
//!
//! let kinds: Vec<_> = Lexer::from_source("x\n")
//!     .map(|t| t.unwrap().kind)
//!     .collect();
//! assert_eq!(kinds.last(), Some(&TokenKind::Eof));
//! ```

use super::core::{CharStream, StreamError};
use super::error::LexerError;
use super::scanner::Scanner;
use crate::compiler::lexer::token::Token;
use crate::compiler::lexer::token_kind::TokenKind;
use sable_config::LexerConfig;
use std::collections::VecDeque;
use std::io::Read;

use tracing::{debug, trace};

const TARGET: &str = "sable::lexer";

/// 解析器的 token 来源
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, LexerError>;
}

pub struct Lexer {
    scanner: Scanner,
    produced: usize,
    finished: bool,
}

impl Lexer {
    pub fn new(stream: CharStream, config: &LexerConfig) -> Self {
        Self {
            scanner: Scanner::new(stream, config),
            produced: 0,
            finished: false,
        }
    }

    /// 使用默认配置从字符串创建
    pub fn from_source(source: &str) -> Self {
        Self::new(CharStream::new(source), &LexerConfig::default())
    }

    pub fn from_reader<R: Read>(reader: R, config: &LexerConfig) -> Result<Self, StreamError> {
        Ok(Self::new(CharStream::from_reader(reader)?, config))
    }

    /// 已产出的 token 数
    pub fn produced(&self) -> usize {
        self.produced
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// 获取下一个 Token
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        match self.scanner.next_token() {
            Ok(token) => {
                self.produced += 1;
                trace!(
                    target: TARGET,
                    kind = ?token.kind,
                    value = ?token.value,
                    line = token.position.line,
                    column = token.position.column,
                    "Produced token"
                );
                if token.kind == TokenKind::Eof {
                    self.finished = true;
                    debug!(target: TARGET, tokens = self.produced, "Reached EOF");
                }
                Ok(token)
            }
            Err(err) => {
                self.finished = true;
                Err(err)
            }
        }
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Result<Token, LexerError> {
        Lexer::next_token(self)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        Some(Lexer::next_token(self))
    }
}

/// 预先给定的 token 序列，用于单独测试解析器
///
/// 序列耗尽后返回 `PastEndOfInput`。
impl TokenSource for VecDeque<Token> {
    fn next_token(&mut self) -> Result<Token, LexerError> {
        self.pop_front().ok_or(LexerError::PastEndOfInput {
            position: Default::default(),
        })
    }
}
