//! Sable - An indentation-sensitive scripting language front end
//!
//! Sable turns source text into a token stream with synthesized
//! `Indent` / `Dedent` tokens and parses it into a syntax tree, collecting
//! syntax errors instead of stopping at the first one.
//!
//! # Architecture
//!
//! ```text
//! sable-config/  - Configuration data structures
//! sable-core/    - Tokenizer and parser (pure logic, no IO)
//! sable-api/     - Run configuration, unified errors, structured reports
//! sable-cli/     - Command line front end
//! ```
//!
//! # Quick Start
//!
//! ```
//! use sable_workspace::{parse, RunConfig};
//!
//! let output = parse("func add(a, b) =\n    return a + b\n", &RunConfig::default()).unwrap();
//! assert!(output.is_clean());
//! assert_eq!(output.block.len(), 1);
//! ```

pub use sable_api::*;

// 核心层
pub use sable_core::compiler;
pub use sable_core::kit;
