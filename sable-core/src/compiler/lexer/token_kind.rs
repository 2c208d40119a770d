//! Sable Token 类型定义

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
#[repr(u8)]
pub enum TokenKind {
    // 结构类型
    Indent = 0,
    Dedent,
    Newline,
    Eof,
    Error,

    // 字面量
    Integer = 10,
    Float,
    String,
    Identifier,
    True,
    False,

    // 关键字
    Function = 20,
    Struct,
    If,
    ElseIf,
    Else,
    While,
    ForEach,
    And,
    Or,
    Not,
    Return,

    // 算术运算符及其复合赋值
    Plus = 40,
    PlusAssign,
    Minus,
    MinusAssign,
    Multiply,
    MultiplyAssign,
    Divide,
    DivideAssign,
    Modulo,
    ModuloAssign,
    Exponent,
    ExponentAssign,

    // 比较与赋值
    Equal = 60,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Assignment,

    // 标点
    LParen = 80,
    RParen,
    LSquare,
    RSquare,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Dot,
}

/// 关键字表
static KEYWORD_TABLE: &[(&str, TokenKind)] = &[
    ("func", TokenKind::Function),
    ("struct", TokenKind::Struct),
    ("if", TokenKind::If),
    ("elif", TokenKind::ElseIf),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("for", TokenKind::ForEach),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("not", TokenKind::Not),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("return", TokenKind::Return),
];

impl TokenKind {
    /// 查找关键字，不是关键字时返回 `None`
    pub fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORD_TABLE
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, kind)| *kind)
    }

    pub fn is_keyword(&self) -> bool {
        KEYWORD_TABLE.iter().any(|(_, kind)| kind == self)
    }

    /// 只能出现在语句开头的关键字
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Function
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Struct
                | TokenKind::Return
        )
    }

    /// 复合赋值运算符（`+=` 等）以及 `=`
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::Assignment
                | TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::MultiplyAssign
                | TokenKind::DivideAssign
                | TokenKind::ModuloAssign
                | TokenKind::ExponentAssign
        )
    }

    /// 固定词素；字面量与结构 token 没有
    pub fn lexeme(&self) -> Option<&'static str> {
        if let Some((text, _)) = KEYWORD_TABLE.iter().find(|(_, kind)| kind == self) {
            return Some(text);
        }
        let text = match self {
            TokenKind::Plus => "+",
            TokenKind::PlusAssign => "+=",
            TokenKind::Minus => "-",
            TokenKind::MinusAssign => "-=",
            TokenKind::Multiply => "*",
            TokenKind::MultiplyAssign => "*=",
            TokenKind::Divide => "/",
            TokenKind::DivideAssign => "/=",
            TokenKind::Modulo => "%",
            TokenKind::ModuloAssign => "%=",
            TokenKind::Exponent => "**",
            TokenKind::ExponentAssign => "**=",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::LessThan => "<",
            TokenKind::GreaterThan => ">",
            TokenKind::LessThanOrEqual => "<=",
            TokenKind::GreaterThanOrEqual => ">=",
            TokenKind::Assignment => "=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LSquare => "[",
            TokenKind::RSquare => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            _ => return None,
        };
        Some(text)
    }
}

impl From<TokenKind> for u8 {
    fn from(val: TokenKind) -> Self {
        val as u8
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lexeme() {
            Some(text) => write!(f, "'{text}'"),
            None => match self {
                TokenKind::Indent => write!(f, "indent"),
                TokenKind::Dedent => write!(f, "dedent"),
                TokenKind::Newline => write!(f, "newline"),
                TokenKind::Eof => write!(f, "end of input"),
                TokenKind::Error => write!(f, "invalid token"),
                TokenKind::Integer => write!(f, "integer"),
                TokenKind::Float => write!(f, "float"),
                TokenKind::String => write!(f, "string"),
                TokenKind::Identifier => write!(f, "identifier"),
                other => write!(f, "{other:?}"),
            },
        }
    }
}
