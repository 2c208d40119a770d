//! API 类型定义
//!
//! 解析的输出类型。

use crate::error::ErrorReport;
use sable_core::compiler::parser::{Block, ParserError};

/// 解析输出
#[derive(Debug)]
pub struct ParseOutput {
    /// 顶层代码块，出错的语句已被跳过
    pub block: Block,
    /// 恢复过程中记录的错误，按出现顺序
    pub errors: Vec<ParserError>,
}

impl ParseOutput {
    /// 没有记录任何错误
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// 记录的错误转为结构化报告
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.errors.iter().map(ErrorReport::from).collect()
    }
}
