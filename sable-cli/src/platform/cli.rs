//! CLI 格式化输出
//!
//! 提供 token / AST 的文本与 JSON 输出，以及带源码上下文的错误显示。

use sable_api::{Block, ErrorReport, SableError, Token};
use serde_json::json;

/// 标准输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// 每个 token 一行
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|t| format!("{t}\n")).collect()
}

/// 按源码缩进风格输出 AST
pub fn render_ast(block: &Block) -> String {
    block.iter().map(|s| s.to_string()).collect()
}

/// 组装 JSON 输出；未请求的部分不出现
pub fn json_document(
    tokens: Option<&[Token]>,
    block: Option<&Block>,
    errors: &[ErrorReport],
    aborted: bool,
) -> serde_json::Value {
    let mut document = json!({
        "errors": errors,
        "aborted": aborted,
    });
    if let Some(tokens) = tokens {
        document["tokens"] = json!(tokens);
    }
    if let Some(block) = block {
        document["ast"] = json!(block);
    }
    document
}

/// 打印错误并显示源代码上下文
pub fn print_error_with_source(e: &SableError, source: &str) {
    print_report_with_source(&e.to_report(), source);
}

pub fn print_report_with_source(report: &ErrorReport, source: &str) {
    eprintln!("❌ {report}");
    if let (Some(line), Some(col)) = (report.line, report.column) {
        eprint!("{}", source_context(source, line, col));
    }
}

/// 源代码上下文（错误行前后几行），错误列下方加 `^`
pub fn source_context(source: &str, error_line: usize, error_col: usize) -> String {
    const CONTEXT_LINES: usize = 2;

    let lines: Vec<&str> = source.lines().collect();
    let total_lines = lines.len();

    // EOF 处的错误可能落在最后一行之后
    if error_line == 0 || error_line > total_lines + 1 {
        return String::new();
    }

    let start_line = error_line.saturating_sub(CONTEXT_LINES).max(1);
    let end_line = (error_line + CONTEXT_LINES).min(total_lines).max(error_line);
    let width = end_line.to_string().len();

    let separator = "-".repeat(width + 1);
    let mut out = format!("{separator}|--\n");

    for line_idx in start_line..=end_line {
        let content = lines.get(line_idx - 1).copied().unwrap_or("");
        out.push_str(&format!("{line_idx:>width$} | {content}\n"));
        if line_idx == error_line {
            let marker = " ".repeat(error_col.saturating_sub(1));
            out.push_str(&format!("{:width$} | {marker}^\n", ""));
        }
    }

    out.push_str(&format!("{separator}|--\n"));
    out
}
