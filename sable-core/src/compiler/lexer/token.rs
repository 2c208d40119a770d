//! Token：分词器的输出

use super::token_kind::TokenKind;
use crate::kit::lexer::{LexErrorKind, SourcePosition};
use serde::Serialize;
use std::fmt;

/// 字面量载荷
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Integer(i64),
    Float(f64),
    /// 已去掉引号并解析转义
    String(String),
    Identifier(String),
    /// `Error` token 的诊断信息
    Error(LexErrorKind),
}

/// Token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub position: SourcePosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TokenValue>,
}

impl Token {
    /// 无载荷 token（标点、关键字、结构 token）
    pub fn new(kind: TokenKind, position: SourcePosition) -> Self {
        Self {
            kind,
            position,
            value: None,
        }
    }

    pub fn with_value(kind: TokenKind, position: SourcePosition, value: TokenValue) -> Self {
        Self {
            kind,
            position,
            value: Some(value),
        }
    }

    pub fn error(kind: LexErrorKind, position: SourcePosition) -> Self {
        Self::with_value(TokenKind::Error, position, TokenValue::Error(kind))
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// 标识符名或字符串内容
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(TokenValue::Identifier(s)) | Some(TokenValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<&LexErrorKind> {
        match &self.value {
            Some(TokenValue::Error(kind)) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}:{:<3} {:?}", self.position.line, self.position.column, self.kind)?;
        match &self.value {
            Some(TokenValue::Integer(v)) => write!(f, " {v}"),
            Some(TokenValue::Float(v)) => write!(f, " {v:?}"),
            Some(TokenValue::String(s)) => write!(f, " {s:?}"),
            Some(TokenValue::Identifier(s)) => write!(f, " {s}"),
            Some(TokenValue::Error(e)) => write!(f, " ({e})"),
            None => Ok(()),
        }
    }
}
