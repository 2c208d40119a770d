//! 字符流抽象
//!
//! 将一次性提供的输入转换为 `(位置, 字符)` 序列：
//! - `\r`、`\n`、`\r\n` 统一为一个逻辑换行 `'\n'`
//! - 只前进，不回溯
//! - 到达末尾后重复调用始终返回 `None`

use std::io::Read;

use super::position::SourcePosition;
use tracing::warn;

/// 字符流错误
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("UTF-8 decode error at byte offset {0}")]
    Utf8Error(usize),

    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

/// 字符流
#[derive(Debug, Clone)]
pub struct CharStream {
    source: String,
    /// 下一个未读字节
    offset: usize,
    /// 下一个未读字符的位置
    position: SourcePosition,
}

impl CharStream {
    /// 从内存字符串创建
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            offset: 0,
            position: SourcePosition::start(),
        }
    }

    /// 从字节缓冲区创建，要求合法 UTF-8
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StreamError> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Self::new(text)),
            Err(e) => Err(StreamError::Utf8Error(e.valid_up_to())),
        }
    }

    /// 从字节缓冲区创建，非法序列替换为 U+FFFD
    pub fn from_bytes_lossy(bytes: &[u8]) -> Self {
        if let Err(e) = std::str::from_utf8(bytes) {
            warn!(
                target: "sable::lexer",
                offset = e.valid_up_to(),
                "Invalid UTF-8 in source, using replacement character"
            );
        }
        Self::new(String::from_utf8_lossy(bytes).into_owned())
    }

    /// 读完一个打开的输入流
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, StreamError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// 下一个未读字符的位置；到达末尾时为输入末尾位置
    pub fn position(&self) -> SourcePosition {
        self.position
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// 从字节偏移 `from` 开始的原始输入（未归一化换行）
    pub fn text_from(&self, from: usize) -> &str {
        self.source.get(from..).unwrap_or("")
    }

    /// 读取一个字符
    ///
    /// 换行序列被归一化为单个 `'\n'`，其位置仍属于换行前的那一行。
    pub fn advance(&mut self) -> Option<(SourcePosition, char)> {
        let rest = &self.source[self.offset..];
        let c = rest.chars().next()?;
        let at = self.position;

        match c {
            '\r' => {
                let len = if rest[1..].starts_with('\n') { 2 } else { 1 };
                self.offset += len;
                self.position.advance_line(len);
                Some((at, '\n'))
            }
            '\n' => {
                self.offset += 1;
                self.position.advance_line(1);
                Some((at, '\n'))
            }
            _ => {
                self.offset += c.len_utf8();
                self.position.advance(c);
                Some((at, c))
            }
        }
    }
}
