//! 平台相关输出

pub mod cli;

pub use cli::{
    json_document, print_error_with_source, print_report_with_source, render_ast, render_tokens,
    OutputFormat,
};
