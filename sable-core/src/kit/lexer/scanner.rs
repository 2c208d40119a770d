//! 分词状态机
//!
//! 每个状态是一个转移函数：读取 `LexContext`，返回 `(下一状态, 可选 token)`。
//! `Scanner::next_token` 用单一 match 循环驱动这些函数，直到产出一个 token。
//!
//! 状态转移：
//! ```text
//! FileStart ─▶ Indent ─▶ Dispatch ─┬▶ Number ─┐
//!                ▲   │             ├▶ String ─┤
//!                │   ▼             ├▶ Word   ─┤
//!                │ Dedent          └──────────┴─▶ Indent
//!                │   │
//!                └───┴─(EOF)─▶ FileEnd ─▶ Eof ─▶ Done
//! ```

use super::context::{BracketMismatch, LexContext};
use super::core::{CharStream, SourcePosition};
use super::error::{LexErrorKind, LexerError};
use crate::compiler::lexer::token::{Token, TokenValue};
use crate::compiler::lexer::token_kind::TokenKind;
use sable_config::LexerConfig;

use tracing::{debug, trace};

const TARGET: &str = "sable::lexer";

/// 状态标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    FileStart,
    /// 行首缩进测量
    Indent,
    /// 运算符/标点识别与分发
    Dispatch,
    Number,
    String,
    Word,
    /// 逐个弹出缩进层，直到栈顶等于 `target`
    Dedent { target: usize },
    FileEnd,
    Eof,
    /// 已输出 EOF，没有后继状态
    Done,
}

type Step = (LexState, Option<Token>);

/// 是否为保留字符（运算符、括号、引号、空白）
///
/// 标识符由连续的非保留字符组成。
pub fn is_reserved(c: char) -> bool {
    matches!(
        c,
        '!' | '=' | '<' | '>' | '.' | ':' | ',' | '+' | '-' | '/' | '*' | '%' | '^'
            | '(' | ')' | '[' | ']' | '{' | '}' | '"'
    ) || c.is_whitespace()
}

/// 行内空白（不含换行）
fn is_inline_whitespace(c: char) -> bool {
    c != '\n' && c.is_whitespace()
}

/// 转义表
fn unescape(c: char) -> Option<char> {
    Some(match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '\\' => '\\',
        '"' => '"',
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'v' => '\u{0B}',
        '0' => '\0',
        _ => return None,
    })
}

/// 分词状态机
pub struct Scanner {
    ctx: LexContext,
    state: LexState,
    tab_width: usize,
    /// 当前逻辑行已经输出过内容 token
    line_open: bool,
}

impl Scanner {
    pub fn new(stream: CharStream, config: &LexerConfig) -> Self {
        trace!(target: TARGET, tab_width = config.tab_width, "Creating new Scanner");
        Self {
            ctx: LexContext::new(stream),
            state: LexState::FileStart,
            tab_width: config.tab_width,
            line_open: false,
        }
    }

    pub fn state(&self) -> LexState {
        self.state
    }

    pub fn context(&self) -> &LexContext {
        &self.ctx
    }

    /// 产出下一个 token
    ///
    /// 输出 EOF 之后再调用返回 `LexerError::PastEndOfInput`。
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        loop {
            let (next, token) = match self.state {
                LexState::FileStart => self.file_start(),
                LexState::Indent => self.indent()?,
                LexState::Dispatch => self.dispatch(),
                LexState::Number => (LexState::Indent, Some(self.scan_number())),
                LexState::String => (LexState::Indent, Some(self.scan_string())),
                LexState::Word => (LexState::Indent, Some(self.scan_word())),
                LexState::Dedent { target } => self.dedent(target),
                LexState::FileEnd => self.file_end(),
                LexState::Eof => (
                    LexState::Done,
                    Some(Token::new(TokenKind::Eof, self.ctx.position())),
                ),
                LexState::Done => {
                    return Err(LexerError::PastEndOfInput {
                        position: self.ctx.position(),
                    })
                }
            };

            if next != self.state {
                trace!(target: TARGET, from = ?self.state, to = ?next, "State transition");
            }
            self.state = next;

            if let Some(token) = token {
                match token.kind {
                    TokenKind::Newline => self.line_open = false,
                    TokenKind::Indent | TokenKind::Dedent | TokenKind::Eof => {}
                    _ => self.line_open = true,
                }
                return Ok(token);
            }
        }
    }

    // ==================== 结构状态 ====================

    fn file_start(&mut self) -> Step {
        self.ctx.push_indent(0);
        (
            LexState::Indent,
            Some(Token::new(TokenKind::Indent, self.ctx.position())),
        )
    }

    fn indent(&mut self) -> Result<Step, LexerError> {
        if self.ctx.is_eof() {
            return Ok(self.end_of_input());
        }
        if self.ctx.in_brackets() || self.ctx.position().column != 1 {
            return Ok((LexState::Dispatch, None));
        }

        let mut width = 0;
        while let Some(c) = self.ctx.current() {
            match c {
                ' ' => width += 1,
                '\t' => width += self.tab_width,
                c if is_inline_whitespace(c) => {}
                _ => break,
            }
            self.ctx.advance();
        }

        match self.ctx.current() {
            None => return Ok(self.end_of_input()),
            // 空行
            Some('\n') => {
                self.ctx.advance();
                return Ok((LexState::Indent, None));
            }
            Some(_) => {}
        }

        let position = self.ctx.position();
        let top = self.ctx.indent();
        if width == top {
            Ok((LexState::Dispatch, None))
        } else if width > top {
            self.ctx.push_indent(width);
            trace!(target: TARGET, width, "Indent");
            Ok((LexState::Dispatch, Some(Token::new(TokenKind::Indent, position))))
        } else if self.ctx.has_indent(width) {
            Ok((LexState::Dedent { target: width }, None))
        } else {
            let err = LexerError::MismatchedIndent {
                width,
                levels: self.ctx.indent_levels().to_vec(),
                position,
            };
            debug!(target: TARGET, error = %err, "Fatal lexer error");
            Err(err)
        }
    }

    /// 输入结束：报告未闭合括号，补齐换行，然后展开缩进
    fn end_of_input(&mut self) -> Step {
        let position = self.ctx.position();
        if let Some(opener) = self.ctx.drain_brackets() {
            return (
                LexState::Indent,
                Some(Token::error(LexErrorKind::UnclosedBracket(opener), position)),
            );
        }
        if self.line_open {
            return (LexState::Indent, Some(Token::new(TokenKind::Newline, position)));
        }
        (LexState::Dedent { target: 0 }, None)
    }

    fn dedent(&mut self, target: usize) -> Step {
        if self.ctx.indent() > target {
            self.ctx.pop_indent();
            let token = Token::new(TokenKind::Dedent, self.ctx.position());
            (LexState::Dedent { target }, Some(token))
        } else if self.ctx.is_eof() {
            (LexState::FileEnd, None)
        } else {
            (LexState::Dispatch, None)
        }
    }

    fn file_end(&mut self) -> Step {
        // 弹出哨兵 0，对应 FileStart 的 Indent
        self.ctx.pop_indent();
        (
            LexState::Eof,
            Some(Token::new(TokenKind::Dedent, self.ctx.position())),
        )
    }

    // ==================== 分发 ====================

    fn dispatch(&mut self) -> Step {
        // 括号内的换行视为空白，除非下一行显然开始了新语句
        while let Some(c) = self.ctx.current() {
            if c == '\n' && self.ctx.in_brackets() && self.next_line_starts_statement() {
                return (LexState::Dispatch, Some(self.abandon_brackets()));
            }
            if is_inline_whitespace(c) || (c == '\n' && self.ctx.in_brackets()) {
                self.ctx.advance();
            } else {
                break;
            }
        }

        let position = self.ctx.position();
        let Some(c) = self.ctx.current() else {
            return (LexState::Indent, None);
        };

        match c {
            '\n' => {
                self.ctx.advance();
                (LexState::Indent, Some(Token::new(TokenKind::Newline, position)))
            }
            '0'..='9' => (LexState::Number, None),
            '"' => (LexState::String, None),
            c if is_reserved(c) => (LexState::Indent, Some(self.scan_operator(c, position))),
            _ => (LexState::Word, None),
        }
    }

    /// 当前换行之后的一行是否以语句关键字开头，且不比开括号所在行缩进更深
    fn next_line_starts_statement(&self) -> bool {
        let rest = self.ctx.remaining();
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\r'))
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);

        let mut width = 0;
        let mut word_start = rest.len();
        for (i, c) in rest.char_indices() {
            match c {
                ' ' => width += 1,
                '\t' => width += self.tab_width,
                c if is_inline_whitespace(c) => {}
                _ => {
                    word_start = i;
                    break;
                }
            }
        }
        let line = &rest[word_start..];
        let word = line.find(is_reserved).map_or(line, |end| &line[..end]);

        width <= self.ctx.bracket_indent()
            && TokenKind::keyword(word).is_some_and(|kind| kind.starts_statement())
    }

    /// 放弃所有未闭合括号，恢复换行与缩进追踪
    fn abandon_brackets(&mut self) -> Token {
        let position = self.ctx.position();
        let opener = self.ctx.drain_brackets().unwrap_or('(');
        debug!(target: TARGET, line = position.line, opener = %opener, "Unclosed bracket before new statement");
        Token::error(LexErrorKind::UnclosedBracket(opener), position)
    }

    /// 最长匹配识别运算符与标点
    fn scan_operator(&mut self, c: char, position: SourcePosition) -> Token {
        let kind = match c {
            '+' => self.with_assign(TokenKind::Plus, TokenKind::PlusAssign),
            '-' => self.with_assign(TokenKind::Minus, TokenKind::MinusAssign),
            '/' => self.with_assign(TokenKind::Divide, TokenKind::DivideAssign),
            '%' => self.with_assign(TokenKind::Modulo, TokenKind::ModuloAssign),
            '=' => self.with_assign(TokenKind::Assignment, TokenKind::Equal),
            '<' => self.with_assign(TokenKind::LessThan, TokenKind::LessThanOrEqual),
            '>' => self.with_assign(TokenKind::GreaterThan, TokenKind::GreaterThanOrEqual),
            '*' => {
                self.ctx.advance();
                if self.ctx.match_char('*') {
                    if self.ctx.match_char('=') {
                        TokenKind::ExponentAssign
                    } else {
                        TokenKind::Exponent
                    }
                } else if self.ctx.match_char('=') {
                    TokenKind::MultiplyAssign
                } else {
                    TokenKind::Multiply
                }
            }
            '!' => {
                self.ctx.advance();
                if !self.ctx.match_char('=') {
                    return Token::error(LexErrorKind::StrayBang, position);
                }
                TokenKind::NotEqual
            }
            '.' => self.single(TokenKind::Dot),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            '(' | '[' | '{' => {
                self.ctx.advance();
                self.ctx.push_bracket(c);
                match c {
                    '(' => TokenKind::LParen,
                    '[' => TokenKind::LSquare,
                    _ => TokenKind::LBrace,
                }
            }
            ')' | ']' | '}' => {
                self.ctx.advance();
                match self.ctx.pop_bracket(c) {
                    Ok(_) => match c {
                        ')' => TokenKind::RParen,
                        ']' => TokenKind::RSquare,
                        _ => TokenKind::RBrace,
                    },
                    Err(BracketMismatch::Unopened) => {
                        return Token::error(LexErrorKind::UnmatchedCloser(c), position)
                    }
                    Err(BracketMismatch::Expected(expected)) => {
                        return Token::error(
                            LexErrorKind::MismatchedBracket { expected, found: c },
                            position,
                        )
                    }
                }
            }
            other => {
                self.ctx.advance();
                return Token::error(LexErrorKind::UnexpectedCharacter(other), position);
            }
        };
        Token::new(kind, position)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.ctx.advance();
        kind
    }

    /// `x` 或 `x=`
    fn with_assign(&mut self, plain: TokenKind, assign: TokenKind) -> TokenKind {
        self.ctx.advance();
        if self.ctx.match_char('=') {
            assign
        } else {
            plain
        }
    }

    // ==================== 字面量 ====================

    fn scan_number(&mut self) -> Token {
        let position = self.ctx.position();
        let mut lexeme = String::new();

        let radix = match (self.ctx.current(), self.ctx.peek()) {
            (Some('0'), Some('x' | 'X')) => 16,
            (Some('0'), Some('b' | 'B')) => 2,
            (Some('0'), Some('o' | 'O')) => 8,
            _ => 10,
        };
        if radix != 10 {
            lexeme.extend(self.ctx.advance());
            lexeme.extend(self.ctx.advance());
        }

        let Some(digits) = self.consume_digits(radix, &mut lexeme) else {
            return self.invalid_number(lexeme, position);
        };

        let fraction_follows = radix == 10
            && self.ctx.check('.')
            && self.ctx.peek().is_some_and(|c| c.is_ascii_digit());
        if fraction_follows {
            self.ctx.advance();
            lexeme.push('.');
            let Some(fraction) = self.consume_digits(10, &mut lexeme) else {
                return self.invalid_number(lexeme, position);
            };
            if self.at_word_char() {
                return self.invalid_number(lexeme, position);
            }
            return match format!("{digits}.{fraction}").parse::<f64>() {
                Ok(value) => Token::with_value(TokenKind::Float, position, TokenValue::Float(value)),
                Err(_) => Token::error(LexErrorKind::InvalidNumber(lexeme), position),
            };
        }

        if self.at_word_char() {
            return self.invalid_number(lexeme, position);
        }

        match i64::from_str_radix(&digits, radix) {
            Ok(value) => Token::with_value(TokenKind::Integer, position, TokenValue::Integer(value)),
            Err(_) => Token::error(LexErrorKind::IntegerOverflow(lexeme), position),
        }
    }

    /// 读取一串数字，`_` 只能夹在两个数字之间
    ///
    /// 返回去掉分隔符的数字；没有数字或分隔符非法时返回 `None`。
    fn consume_digits(&mut self, radix: u32, lexeme: &mut String) -> Option<String> {
        let mut digits = String::new();
        while let Some(c) = self.ctx.current() {
            if c.is_digit(radix) {
                digits.push(c);
            } else if c == '_' {
                let next_is_digit = self.ctx.peek().is_some_and(|n| n.is_digit(radix));
                if digits.is_empty() || !next_is_digit {
                    return None;
                }
            } else {
                break;
            }
            lexeme.push(c);
            self.ctx.advance();
        }
        (!digits.is_empty()).then_some(digits)
    }

    fn at_word_char(&self) -> bool {
        self.ctx.current().is_some_and(|c| !is_reserved(c))
    }

    /// 吞掉数字后面粘连的字符，整体作为一个错误 token
    fn invalid_number(&mut self, mut lexeme: String, position: SourcePosition) -> Token {
        while self.at_word_char() {
            lexeme.extend(self.ctx.advance());
        }
        debug!(target: TARGET, %lexeme, "Invalid number literal");
        Token::error(LexErrorKind::InvalidNumber(lexeme), position)
    }

    fn scan_string(&mut self) -> Token {
        let position = self.ctx.position();
        self.ctx.advance();

        let mut value = String::new();
        // 第一个非法转义；字符串仍读到结尾，只报一次
        let mut bad_escape = None;

        loop {
            let at = self.ctx.position();
            match self.ctx.current() {
                None => return Token::error(LexErrorKind::UnterminatedString, position),
                Some('\n') => return Token::error(LexErrorKind::NewlineInString, at),
                Some('"') => {
                    self.ctx.advance();
                    break;
                }
                Some('\\') => {
                    self.ctx.advance();
                    match self.ctx.current() {
                        None => return Token::error(LexErrorKind::UnterminatedString, position),
                        Some('\n') => {
                            return Token::error(LexErrorKind::NewlineInString, self.ctx.position())
                        }
                        Some(e) => {
                            self.ctx.advance();
                            match unescape(e) {
                                Some(c) => value.push(c),
                                None if bad_escape.is_none() => {
                                    bad_escape = Some((LexErrorKind::InvalidEscape(e), at));
                                }
                                None => {}
                            }
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.ctx.advance();
                }
            }
        }

        match bad_escape {
            Some((kind, at)) => Token::error(kind, at),
            None => Token::with_value(TokenKind::String, position, TokenValue::String(value)),
        }
    }

    fn scan_word(&mut self) -> Token {
        let position = self.ctx.position();
        let mut word = String::new();
        while self.at_word_char() {
            word.extend(self.ctx.advance());
        }

        match TokenKind::keyword(&word) {
            Some(kind) => {
                trace!(target: TARGET, keyword = %word, "Matched keyword");
                Token::new(kind, position)
            }
            None => Token::with_value(TokenKind::Identifier, position, TokenValue::Identifier(word)),
        }
    }
}
