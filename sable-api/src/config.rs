//! API 层配置
//!
//! 包含运行配置 RunConfig 和全局单例（供 CLI 使用）

use once_cell::sync::OnceCell;
use sable_config::{LexerConfig, ParserConfig, SableConfig};

/// Front-end run configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Tokenizer configuration
    pub lexer: LexerConfig,
    /// Parser configuration
    pub parser: ParserConfig,
}

impl RunConfig {
    /// Take the front-end sections of a loaded config file
    pub fn from_sable_config(config: &SableConfig) -> Self {
        Self {
            lexer: config.lexer.clone(),
            parser: config.parser.clone(),
        }
    }
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("tab_width", &self.lexer.tab_width)
            .field("recover", &self.parser.recover)
            .field("max_errors", &self.parser.max_errors)
            .field("max_depth", &self.parser.max_depth)
            .finish()
    }
}

// Global config singleton for CLI convenience
static GLOBAL_CONFIG: OnceCell<RunConfig> = OnceCell::new();

/// Initialize global configuration
///
/// Returns the rejected config if one was already installed.
pub fn init(config: RunConfig) -> Result<(), RunConfig> {
    GLOBAL_CONFIG.set(config)
}

/// Get global config reference
///
/// Falls back to (and installs) the default config when `init` was never called.
pub fn config() -> &'static RunConfig {
    GLOBAL_CONFIG.get_or_init(RunConfig::default)
}

/// Check if config is initialized
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}
