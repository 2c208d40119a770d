//! Sable API - Front-end orchestration layer
//!
//! Provides a unified interface over the tokenizer and parser, including:
//! - Configuration abstraction (RunConfig)
//! - Unified error handling (SableError)
//! - Structured error reports for tooling (ErrorReport)
//!
//! For CLI convenience, this crate provides a global singleton API.
//! For library use, prefer the explicit `parse(source, &config)` API.

use tracing::{debug, info};

use sable_core::compiler::lexer::builder::{build_lexer_from_bytes, build_lexer_with_config};
use sable_core::compiler::parser::Parser;
use sable_core::Lexer;

// Re-export config
pub mod config;
pub use config::{config as get_config, init as init_config, is_initialized, RunConfig};

// Re-export config types from sable_config
pub use sable_config::{LexerConfig, LogLevel, LoggingConfig, ParserConfig, Phase, SableConfig};

// Re-export error and types
pub mod error;
pub mod types;
pub use error::{ErrorReport, LexerError, ParserError, ParserErrorKind, SableError, StreamError};
pub use types::ParseOutput;

// Re-export core types
pub use sable_config;
pub use sable_core::compiler::parser::{Stmt, StmtKind};
pub use sable_core::{Block, SourcePosition, Token, TokenKind, TokenValue};

/// Tokenize with explicit configuration
///
/// Returns every token up to and including `Eof`. Recoverable lexical
/// problems appear as `Error` tokens; only fatal ones become `Err`.
pub fn tokenize(source: &str, config: &RunConfig) -> Result<Vec<Token>, SableError> {
    collect_tokens(build_lexer_with_config(source, &config.lexer))
}

/// Tokenize raw bytes, which must be valid UTF-8
pub fn tokenize_bytes(bytes: &[u8], config: &RunConfig) -> Result<Vec<Token>, SableError> {
    collect_tokens(build_lexer_from_bytes(bytes, &config.lexer)?)
}

fn collect_tokens(lexer: Lexer) -> Result<Vec<Token>, SableError> {
    let tokens = lexer.collect::<Result<Vec<_>, _>>()?;
    debug!(count = tokens.len(), "Tokenize completed");
    Ok(tokens)
}

/// Parse with explicit configuration
///
/// This is the recommended API for library users. Recovered syntax errors
/// are returned in `ParseOutput::errors`; `Err` means the parse was aborted.
pub fn parse(source: &str, config: &RunConfig) -> Result<ParseOutput, SableError> {
    parse_with_lexer(build_lexer_with_config(source, &config.lexer), config)
}

/// Parse raw bytes, which must be valid UTF-8
pub fn parse_bytes(bytes: &[u8], config: &RunConfig) -> Result<ParseOutput, SableError> {
    parse_with_lexer(build_lexer_from_bytes(bytes, &config.lexer)?, config)
}

fn parse_with_lexer(lexer: Lexer, config: &RunConfig) -> Result<ParseOutput, SableError> {
    info!("Starting parse");

    let mut parser = Parser::with_config(lexer, config.parser.clone()).map_err(aborted)?;
    let block = parser.parse().map_err(aborted)?;
    let errors = parser.take_errors();

    info!(
        statements = block.len(),
        errors = errors.len(),
        "Parse completed"
    );
    Ok(ParseOutput { block, errors })
}

// 致命词法错误按词法阶段报告
fn aborted(err: ParserError) -> SableError {
    match err.kind {
        ParserErrorKind::Fatal(fatal) => SableError::Lexer(fatal),
        _ => SableError::Parser(err),
    }
}

// ==================== Convenience API (using global config) ====================

/// Tokenize source code (uses global config)
pub fn tokenize_quick(source: &str) -> Result<Vec<Token>, SableError> {
    tokenize(source, get_config())
}

/// Parse source code (uses global config)
pub fn parse_quick(source: &str) -> Result<ParseOutput, SableError> {
    parse(source, get_config())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_ends_with_eof() {
        let tokens = tokenize("x = 1\n", &RunConfig::default()).unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Indent,
                TokenKind::Identifier,
                TokenKind::Assignment,
                TokenKind::Integer,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_fatal_indent() {
        let err = tokenize("a\n    b\n  c\n", &RunConfig::default()).unwrap_err();
        assert!(matches!(err, SableError::Lexer(LexerError::MismatchedIndent { .. })));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_tokenize_bytes_rejects_bad_utf8() {
        let err = tokenize_bytes(b"x = \xff\n", &RunConfig::default()).unwrap_err();
        assert!(matches!(err, SableError::Stream(_)));
    }

    #[test]
    fn test_parse_clean() {
        let output = parse("func f(a) =\n    return a\n", &RunConfig::default()).unwrap();
        assert!(output.is_clean());
        assert_eq!(output.block.len(), 1);
    }

    #[test]
    fn test_parse_collects_errors() {
        let output = parse("a = )\nb\n", &RunConfig::default()).unwrap();
        assert!(!output.is_clean());
        assert_eq!(output.block.len(), 1);
        let reports = output.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].line, Some(1));
    }

    #[test]
    fn test_parse_fatal_is_reported_as_lexer_error() {
        let err = parse("a\n    b\n  c\n", &RunConfig::default()).unwrap_err();
        assert!(matches!(err, SableError::Lexer(_)));
        assert_eq!(err.phase(), "lexer");
    }

    #[test]
    fn test_nesting_limit_report() {
        let config = RunConfig {
            parser: ParserConfig {
                max_depth: 4,
                ..ParserConfig::default()
            },
            ..RunConfig::default()
        };
        let output = parse("((((((x))))))\n", &config).unwrap();
        assert!(!output.is_clean());
        assert_eq!(output.reports()[0].kind, "NestingTooDeep");
    }

    #[test]
    fn test_parse_without_recovery() {
        let config = RunConfig {
            parser: ParserConfig {
                recover: false,
                ..ParserConfig::default()
            },
            ..RunConfig::default()
        };
        let err = parse("a = *\nb\n", &config).unwrap_err();
        assert!(matches!(err, SableError::Parser(_)));
        assert_eq!(err.to_report().kind, "ExpectedExpression");
    }

    #[test]
    fn test_parse_quick_uses_global_config() {
        let output = parse_quick("x\n").unwrap();
        assert!(output.is_clean());
        assert!(is_initialized());
    }
}
