//! CLI 配置
//!
//! 日志配置：配置文件中的 logging 段与命令行参数合并

use sable_config::{LogLevel, LoggingConfig, Phase};
use tracing::Level;

/// CLI 日志配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub global: Level,
    pub lexer: Option<Level>,
    pub parser: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::WARN,
            lexer: None,
            parser: None,
        }
    }
}

/// `LogLevel` 到 `tracing::Level` 的映射
pub fn to_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

impl LogConfig {
    /// 从配置文件的 logging 段构建
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        let defaults = Self::default();
        Self {
            global: logging.level.map(to_level).unwrap_or(defaults.global),
            lexer: logging.lexer.map(to_level),
            parser: logging.parser.map(to_level),
        }
    }

    /// 命令行参数覆盖配置文件；`None` 保留原值
    pub fn override_with(
        mut self,
        global: Option<LogLevel>,
        lexer: Option<LogLevel>,
        parser: Option<LogLevel>,
    ) -> Self {
        if let Some(level) = global {
            self.global = to_level(level);
        }
        if let Some(level) = lexer {
            self.lexer = Some(to_level(level));
        }
        if let Some(level) = parser {
            self.parser = Some(to_level(level));
        }
        self
    }

    /// Get log level for a specific phase
    pub fn level_for(&self, phase: Phase) -> Level {
        match phase {
            Phase::Lexer => self.lexer.unwrap_or(self.global),
            Phase::Parser => self.parser.unwrap_or(self.global),
        }
    }
}
