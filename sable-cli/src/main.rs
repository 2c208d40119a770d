//! Sable CLI - Command line interface
//!
//! Tokenizes and parses a single source file, printing tokens, the AST and
//! any recorded errors.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;

mod config;
mod logging;
mod platform;

use crate::config::LogConfig;
use crate::logging::{init_with_file, LogFormat};
use crate::platform::{
    json_document, print_error_with_source, print_report_with_source, render_ast, render_tokens,
    OutputFormat,
};
use sable_api::{init_config, parse_bytes, tokenize_bytes, LogLevel, RunConfig, SableConfig};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "sable",
    about = "Sable language front end - tokenize and parse source files",
    version = "0.1.0"
)]
struct Cli {
    /// Source file to parse
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    ast: bool,

    /// Output format for tokens, AST and errors
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    verbose: bool,

    /// Global log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Log level for the lexer phase
    #[arg(long, value_name = "LEVEL")]
    log_lexer: Option<LogLevel>,

    /// Log level for the parser phase
    #[arg(long, value_name = "LEVEL")]
    log_parser: Option<LogLevel>,

    /// Log output format
    #[arg(long, value_enum, default_value = "compact")]
    log_format: LogFormat,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// 命令行日志参数；`--log-level` 优先于 `-v`
    fn global_log_level(&self) -> Option<LogLevel> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level),
            (None, true) => Some(LogLevel::Debug),
            (None, false) => None,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let file_config = match cli.config.as_deref().map(read_config).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let log_config = LogConfig::from_logging(&file_config.logging).override_with(
        cli.global_log_level(),
        cli.log_lexer,
        cli.log_parser,
    );
    if let Err(e) = init_with_file(&log_config, cli.log_format, cli.log_file.as_deref()) {
        eprintln!("Error: {e}");
        return 1;
    }

    let run_config = RunConfig::from_sable_config(&file_config);
    debug!(config = ?run_config, file = %cli.file.display(), "CLI configured");
    // 单进程只初始化一次，失败说明已有配置
    let _ = init_config(run_config.clone());

    let bytes = match std::fs::read(&cli.file) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", cli.file.display(), e);
            return 1;
        }
    };
    // 仅用于错误上下文显示
    let source = String::from_utf8_lossy(&bytes);

    let tokens = if cli.tokens {
        match tokenize_bytes(&bytes, &run_config) {
            Ok(tokens) => Some(tokens),
            Err(e) => return report_abort(cli.format, &e, &source),
        }
    } else {
        None
    };

    let output = match parse_bytes(&bytes, &run_config) {
        Ok(output) => output,
        Err(e) => return report_abort(cli.format, &e, &source),
    };
    let reports = output.reports();

    match cli.format {
        OutputFormat::Json => {
            let document = json_document(
                tokens.as_deref(),
                cli.ast.then_some(&output.block),
                &reports,
                false,
            );
            println!("{document:#}");
        }
        OutputFormat::Text => {
            if let Some(tokens) = &tokens {
                print!("{}", render_tokens(tokens));
            }
            if cli.ast {
                print!("{}", render_ast(&output.block));
            }
            for report in &reports {
                print_report_with_source(report, &source);
            }
            if !reports.is_empty() {
                eprintln!("{} error(s) in {}", reports.len(), cli.file.display());
            }
        }
    }

    if output.is_clean() {
        0
    } else {
        1
    }
}

fn report_abort(format: OutputFormat, e: &sable_api::SableError, source: &str) -> i32 {
    match format {
        OutputFormat::Json => println!("{:#}", json_document(None, None, &[e.to_report()], true)),
        OutputFormat::Text => print_error_with_source(e, source),
    }
    1
}

/// Read and parse a JSON configuration file
fn read_config(path: &Path) -> Result<SableConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("无法读取 '{}': {}", path.display(), e))?;
    SableConfig::from_json_str(&content)
        .map_err(|e| format!("解析 '{}' 失败: {}", path.display(), e))
}
