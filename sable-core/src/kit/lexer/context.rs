//! 词法上下文
//!
//! 各状态共享的可变状态：缩进栈、括号栈、当前/预读字符。
//! 只负责字符消费与栈操作，不包含任何分词策略。

use super::core::{CharStream, SourcePosition};

/// 括号栈弹出失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketMismatch {
    /// 栈为空
    Unopened,
    /// 栈顶开括号与闭括号不配对，栈保持不变
    Expected(char),
}

pub struct LexContext {
    stream: CharStream,
    /// 严格递增，栈底为哨兵 0
    indents: Vec<usize>,
    brackets: Vec<char>,
    /// 最外层开括号所在行的缩进宽度
    bracket_indent: usize,
    current: Option<char>,
    current_position: SourcePosition,
    next: Option<char>,
    next_position: SourcePosition,
}

impl LexContext {
    /// 创建上下文并预读两个字符
    pub fn new(mut stream: CharStream) -> Self {
        let (current_position, current) = Self::pull(&mut stream);
        let (next_position, next) = Self::pull(&mut stream);
        Self {
            stream,
            indents: Vec::new(),
            brackets: Vec::new(),
            bracket_indent: 0,
            current,
            current_position,
            next,
            next_position,
        }
    }

    fn pull(stream: &mut CharStream) -> (SourcePosition, Option<char>) {
        match stream.advance() {
            Some((pos, c)) => (pos, Some(c)),
            None => (stream.position(), None),
        }
    }

    /// 当前字符，`None` 表示输入结束
    pub fn current(&self) -> Option<char> {
        self.current
    }

    /// 预读字符
    pub fn peek(&self) -> Option<char> {
        self.next
    }

    /// 当前字符的位置；输入结束时为末尾位置
    pub fn position(&self) -> SourcePosition {
        self.current_position
    }

    pub fn is_eof(&self) -> bool {
        self.current.is_none()
    }

    /// 前进一个字符，返回被消费的字符
    pub fn advance(&mut self) -> Option<char> {
        let consumed = self.current;
        let (position, c) = Self::pull(&mut self.stream);
        self.current = self.next;
        self.current_position = self.next_position;
        self.next = c;
        self.next_position = position;
        consumed
    }

    /// 从当前字符开始的剩余原始输入
    pub fn remaining(&self) -> &str {
        self.stream.text_from(self.current_position.byte_offset)
    }

    pub fn check(&self, c: char) -> bool {
        self.current == Some(c)
    }

    /// 当前字符为 `c` 时消费它
    pub fn match_char(&mut self, c: char) -> bool {
        if self.check(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ==================== 缩进栈 ====================

    /// 栈顶缩进宽度；空栈视为 0
    pub fn indent(&self) -> usize {
        self.indents.last().copied().unwrap_or(0)
    }

    /// 压入缩进层级，必须严格大于栈顶（首次压入哨兵除外）
    pub fn push_indent(&mut self, width: usize) -> bool {
        if !self.indents.is_empty() && width <= self.indent() {
            return false;
        }
        self.indents.push(width);
        true
    }

    pub fn pop_indent(&mut self) -> Option<usize> {
        self.indents.pop()
    }

    /// 宽度是否为栈上某一层
    pub fn has_indent(&self, width: usize) -> bool {
        self.indents.contains(&width)
    }

    pub fn indent_levels(&self) -> &[usize] {
        &self.indents
    }

    // ==================== 括号栈 ====================

    pub fn push_bracket(&mut self, opener: char) {
        if self.brackets.is_empty() {
            self.bracket_indent = self.indent();
        }
        self.brackets.push(opener);
    }

    /// 最外层开括号所在行的缩进宽度，括号栈为空时无意义
    pub fn bracket_indent(&self) -> usize {
        self.bracket_indent
    }

    /// 用闭括号弹出栈顶开括号
    pub fn pop_bracket(&mut self, closer: char) -> Result<char, BracketMismatch> {
        let top = *self.brackets.last().ok_or(BracketMismatch::Unopened)?;
        if closing_for(top) != closer {
            return Err(BracketMismatch::Expected(closing_for(top)));
        }
        self.brackets.pop();
        Ok(top)
    }

    /// 括号栈非空时暂停缩进追踪
    pub fn in_brackets(&self) -> bool {
        !self.brackets.is_empty()
    }

    /// 清空括号栈，返回最内层未闭合的开括号
    pub fn drain_brackets(&mut self) -> Option<char> {
        let innermost = self.brackets.last().copied();
        self.brackets.clear();
        innermost
    }
}

/// 开括号对应的闭括号
pub fn closing_for(opener: char) -> char {
    match opener {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        other => other,
    }
}
