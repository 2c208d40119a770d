//! Sable Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Sable crates.

use serde::{Deserialize, Serialize};

/// Configuration for the tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    /// Indentation width of a single tab character
    pub tab_width: usize,
}

/// Configuration for the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Skip to a synchronizing token after a failed statement instead of aborting
    pub recover: bool,
    /// Abort once this many errors have been recorded
    pub max_errors: usize,
    /// Deepest allowed nesting of blocks and sub-expressions
    pub max_depth: usize,
}

/// Log verbosity, mirrors `tracing::Level` without depending on it
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Logging section of a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global level, `None` keeps the front-end default
    pub level: Option<LogLevel>,
    /// Lexer phase override
    pub lexer: Option<LogLevel>,
    /// Parser phase override
    pub parser: Option<LogLevel>,
}

/// Top-level configuration, usually loaded from `sable.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SableConfig {
    pub lexer: LexerConfig,
    pub parser: ParserConfig,
    pub logging: LoggingConfig,
}

impl SableConfig {
    /// Parse a JSON config document; missing fields take their defaults
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Front-end phase, used for phase-specific configuration and log targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lexer,
    Parser,
}

impl Phase {
    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Lexer => "lexer",
            Phase::Parser => "parser",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("sable::{}", self.as_str())
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self { tab_width: 4 }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            recover: true,
            max_errors: 64,
            max_depth: 48,
        }
    }
}
