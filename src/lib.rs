pub mod config;
pub mod expression;
pub mod loader;
