pub mod builder;
pub mod token;
pub mod token_kind;
