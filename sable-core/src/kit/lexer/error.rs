//! Lexer 错误类型
//!
//! 两类错误：
//! - `LexErrorKind`：可恢复，作为 `Error` token 的载荷输出，不中断分词
//! - `LexerError`：致命，`next_token` 直接返回 `Err`

use super::core::SourcePosition;
use serde::Serialize;

/// 可恢复的词法错误，由 `Error` token 携带
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected '!', did you mean '!=' or 'not'?")]
    StrayBang,

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("mismatched bracket: expected '{expected}', found '{found}'")]
    MismatchedBracket { expected: char, found: char },

    #[error("unmatched closing bracket '{0}'")]
    UnmatchedCloser(char),

    #[error("bracket '{0}' is never closed")]
    UnclosedBracket(char),

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("integer literal '{0}' does not fit in 64 bits")]
    IntegerOverflow(String),

    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("newline in string literal")]
    NewlineInString,

    #[error("unterminated string literal")]
    UnterminatedString,
}

/// 致命词法错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// 缩进宽度不在缩进栈上，没有合理的恢复 token
    #[error("[{position}] indentation of width {width} does not match any enclosing block (open levels: {levels:?})")]
    MismatchedIndent {
        width: usize,
        levels: Vec<usize>,
        position: SourcePosition,
    },

    /// EOF 之后继续请求 token
    #[error("[{position}] token requested after end of input")]
    PastEndOfInput { position: SourcePosition },
}

impl LexerError {
    pub fn position(&self) -> SourcePosition {
        match self {
            LexerError::MismatchedIndent { position, .. } => *position,
            LexerError::PastEndOfInput { position } => *position,
        }
    }

    /// 获取行号（1-based）
    pub fn line(&self) -> usize {
        self.position().line
    }

    /// 获取列号（1-based）
    pub fn column(&self) -> usize {
        self.position().column
    }

    /// 不含位置前缀的错误消息
    pub fn message(&self) -> String {
        match self {
            LexerError::MismatchedIndent { width, levels, .. } => format!(
                "indentation of width {width} does not match any enclosing block (open levels: {levels:?})"
            ),
            LexerError::PastEndOfInput { .. } => "token requested after end of input".to_string(),
        }
    }
}
