use crate::compiler::lexer::token::Token;
use crate::compiler::lexer::token_kind::TokenKind;
use crate::kit::lexer::{LexErrorKind, LexerError, SourcePosition};

/// 语法错误，包含位置信息
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    /// 错误类型
    pub kind: ParserErrorKind,
    /// 出错 token 的位置
    pub position: SourcePosition,
}

/// 语法错误类型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParserErrorKind {
    /// 意外的token
    #[error("unexpected {received}, expected {}", describe_expected(.expected))]
    UnexpectedToken {
        expected: Vec<TokenKind>,
        received: TokenKind,
    },

    /// 所有原子表达式分支都不匹配
    #[error("expected an expression, found {received}")]
    ExpectedExpression { received: TokenKind },

    /// 词法器输出的 Error token
    #[error("{0}")]
    Lexical(LexErrorKind),

    /// 致命词法错误，不可恢复
    #[error("{0}")]
    Fatal(LexerError),

    /// 记录的错误数超过上限
    #[error("too many errors ({0}), giving up")]
    TooManyErrors(usize),

    /// 块或表达式嵌套超过上限
    #[error("nesting exceeds the limit of {0} levels")]
    NestingTooDeep(usize),
}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => "something else".to_string(),
        [only] => only.to_string(),
        many => {
            let names: Vec<String> = many.iter().map(|k| k.to_string()).collect();
            format!("one of {}", names.join(", "))
        }
    }
}

impl ParserError {
    pub fn new(kind: ParserErrorKind, position: SourcePosition) -> Self {
        Self { kind, position }
    }

    /// 期望 `expected`，实际遇到 `found`
    ///
    /// `found` 是 Error token 时报告其词法诊断。
    pub fn unexpected(expected: &[TokenKind], found: &Token) -> Self {
        let kind = match found.error_kind() {
            Some(lexical) => ParserErrorKind::Lexical(lexical.clone()),
            None => ParserErrorKind::UnexpectedToken {
                expected: expected.to_vec(),
                received: found.kind,
            },
        };
        Self::new(kind, found.position)
    }

    /// 获取行号（1-based）
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// 获取列号（1-based）
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// 期望的 token 类型；非 `UnexpectedToken` 时为空
    pub fn expected(&self) -> &[TokenKind] {
        match &self.kind {
            ParserErrorKind::UnexpectedToken { expected, .. } => expected,
            _ => &[],
        }
    }

    /// 实际遇到的 token 类型
    pub fn received(&self) -> Option<TokenKind> {
        match &self.kind {
            ParserErrorKind::UnexpectedToken { received, .. }
            | ParserErrorKind::ExpectedExpression { received } => Some(*received),
            ParserErrorKind::Lexical(_) => Some(TokenKind::Error),
            _ => None,
        }
    }

    /// 人类可读的错误消息（不含位置）
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// 致命错误无法通过同步恢复
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            ParserErrorKind::Fatal(_) | ParserErrorKind::TooManyErrors(_)
        )
    }
}

impl From<LexerError> for ParserError {
    fn from(err: LexerError) -> Self {
        let position = err.position();
        Self::new(ParserErrorKind::Fatal(err), position)
    }
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            // LexerError 自带位置前缀
            ParserErrorKind::Fatal(err) => write!(f, "{err}"),
            kind => write!(f, "[{}] {kind}", self.position),
        }
    }
}

impl std::error::Error for ParserError {}

/// 解析结果类型
pub type ParseResult<T> = Result<T, ParserError>;
