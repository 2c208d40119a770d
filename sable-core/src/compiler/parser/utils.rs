use super::super::lexer::token_kind::TokenKind;

// 各优先级层的运算符集合，从低到高

pub const ASSIGNMENT_OPERATORS: &[TokenKind] = &[
    TokenKind::Assignment,
    TokenKind::PlusAssign,
    TokenKind::MinusAssign,
    TokenKind::MultiplyAssign,
    TokenKind::DivideAssign,
    TokenKind::ModuloAssign,
    TokenKind::ExponentAssign,
];

pub const OR_OPERATORS: &[TokenKind] = &[TokenKind::Or];

pub const AND_OPERATORS: &[TokenKind] = &[TokenKind::And];

pub const COMPARISON_OPERATORS: &[TokenKind] = &[
    TokenKind::Equal,
    TokenKind::NotEqual,
    TokenKind::LessThan,
    TokenKind::GreaterThan,
    TokenKind::LessThanOrEqual,
    TokenKind::GreaterThanOrEqual,
];

pub const SUM_OPERATORS: &[TokenKind] = &[TokenKind::Plus, TokenKind::Minus];

pub const PRODUCT_OPERATORS: &[TokenKind] =
    &[TokenKind::Multiply, TokenKind::Divide, TokenKind::Modulo];

pub const POWER_OPERATORS: &[TokenKind] = &[TokenKind::Exponent];

/// 函数头中参数列表之后的分隔符
pub const FUNCTION_BODY_MARKERS: &[TokenKind] = &[TokenKind::Assignment, TokenKind::Colon];

/// 错误恢复时可以停下的语句起始关键字
pub fn is_statement_start(kind: TokenKind) -> bool {
    kind.starts_statement()
}
