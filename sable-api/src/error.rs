//! API 错误类型
//!
//! 提供统一的错误类型和结构化错误报告。

use serde::Serialize;
use thiserror::Error;

/// 致命词法错误
pub use sable_core::kit::lexer::LexerError;

/// 源码读取错误
pub use sable_core::kit::lexer::StreamError;

/// 语法错误（结构化）
pub use sable_core::compiler::parser::{ParserError, ParserErrorKind};

use sable_core::kit::lexer::LexErrorKind;

/// Sable 错误类型
///
/// 只包含中止解析的错误；可恢复的语法错误放在 `ParseOutput::errors` 中。
#[derive(Error, Debug)]
pub enum SableError {
    /// 源码不是合法 UTF-8 或读取失败
    #[error("{0}")]
    Stream(#[from] StreamError),

    /// 词法分析错误
    #[error("{0}")]
    Lexer(#[from] LexerError),

    /// 语法分析中止
    #[error("{0}")]
    Parser(#[from] ParserError),
}

impl SableError {
    /// 获取错误行号（如果有）
    pub fn line(&self) -> Option<usize> {
        match self {
            SableError::Stream(_) => None,
            SableError::Lexer(e) => Some(e.line()),
            SableError::Parser(e) => Some(e.line()),
        }
    }

    /// 获取错误列号（如果有）
    pub fn column(&self) -> Option<usize> {
        match self {
            SableError::Stream(_) => None,
            SableError::Lexer(e) => Some(e.column()),
            SableError::Parser(e) => Some(e.column()),
        }
    }

    /// 获取错误阶段名称
    pub fn phase(&self) -> &'static str {
        match self {
            SableError::Stream(_) => "source",
            SableError::Lexer(_) => "lexer",
            SableError::Parser(e) => parser_error_phase(e),
        }
    }

    /// 转换为结构化错误报告
    ///
    /// CLI 可以直接打印，上层应用可以序列化为 JSON。
    pub fn to_report(&self) -> ErrorReport {
        match self {
            SableError::Stream(e) => ErrorReport {
                phase: self.phase(),
                line: None,
                column: None,
                kind: match e {
                    StreamError::Utf8Error(_) => "Utf8Error",
                    StreamError::Io(_) => "Io",
                }
                .to_string(),
                message: e.to_string(),
            },
            SableError::Lexer(e) => ErrorReport {
                phase: self.phase(),
                line: self.line(),
                column: self.column(),
                kind: lexer_error_kind(e).to_string(),
                message: e.message(),
            },
            SableError::Parser(e) => ErrorReport::from(e),
        }
    }
}

// Error token 与致命词法错误在解析期间暴露，但归属词法阶段
fn parser_error_phase(err: &ParserError) -> &'static str {
    match err.kind {
        ParserErrorKind::Lexical(_) | ParserErrorKind::Fatal(_) => "lexer",
        _ => "parser",
    }
}

fn lexer_error_kind(err: &LexerError) -> &'static str {
    match err {
        LexerError::MismatchedIndent { .. } => "MismatchedIndent",
        LexerError::PastEndOfInput { .. } => "PastEndOfInput",
    }
}

fn lexical_kind(kind: &LexErrorKind) -> &'static str {
    match kind {
        LexErrorKind::StrayBang => "StrayBang",
        LexErrorKind::UnexpectedCharacter(_) => "UnexpectedCharacter",
        LexErrorKind::MismatchedBracket { .. } => "MismatchedBracket",
        LexErrorKind::UnmatchedCloser(_) => "UnmatchedCloser",
        LexErrorKind::UnclosedBracket(_) => "UnclosedBracket",
        LexErrorKind::InvalidNumber(_) => "InvalidNumber",
        LexErrorKind::IntegerOverflow(_) => "IntegerOverflow",
        LexErrorKind::InvalidEscape(_) => "InvalidEscape",
        LexErrorKind::NewlineInString => "NewlineInString",
        LexErrorKind::UnterminatedString => "UnterminatedString",
    }
}

fn parser_error_kind(kind: &ParserErrorKind) -> &'static str {
    match kind {
        ParserErrorKind::UnexpectedToken { .. } => "UnexpectedToken",
        ParserErrorKind::ExpectedExpression { .. } => "ExpectedExpression",
        ParserErrorKind::Lexical(lexical) => lexical_kind(lexical),
        ParserErrorKind::Fatal(fatal) => lexer_error_kind(fatal),
        ParserErrorKind::TooManyErrors(_) => "TooManyErrors",
        ParserErrorKind::NestingTooDeep(_) => "NestingTooDeep",
    }
}

/// 结构化错误报告
///
/// 上层应用（CLI、编辑器插件）可以根据自己的需求格式化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// 错误阶段: source, lexer, parser
    pub phase: &'static str,
    /// 错误行号（1-based，如果有）
    pub line: Option<usize>,
    /// 错误列号（1-based，如果有）
    pub column: Option<usize>,
    /// 错误类型（可用于程序化处理）
    pub kind: String,
    /// 人类可读的错误消息
    pub message: String,
}

impl From<&ParserError> for ErrorReport {
    fn from(err: &ParserError) -> Self {
        let message = match &err.kind {
            ParserErrorKind::Fatal(fatal) => fatal.message(),
            kind => kind.to_string(),
        };
        Self {
            phase: parser_error_phase(err),
            line: Some(err.line()),
            column: Some(err.column()),
            kind: parser_error_kind(&err.kind).to_string(),
            message,
        }
    }
}

impl std::fmt::Display for ErrorReport {
    /// 默认的 CLI 友好格式
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(col)) => {
                write!(f, "[{}:{}] {} error: {}", line, col, self.phase, self.message)
            }
            _ => write!(f, "{} error: {}", self.phase, self.message),
        }
    }
}

impl ErrorReport {
    /// 转换为 JSON 格式
    pub fn to_json(&self) -> String {
        // 字段都是字符串与整数，序列化不会失败
        serde_json::to_string(self).unwrap_or_default()
    }

    /// 简洁格式（适合终端）
    pub fn to_short(&self) -> String {
        format!("{}: {}", self.phase, self.message)
    }
}
