//! JSON encoding of expression trees.
//!
//! The query layer hands trees to this crate already built; JSON is the
//! interchange format for trees stored on disk or passed to the CLI.

use crate::expression::ExprNode;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse an expression tree from JSON text
pub fn parse_tree(json: &str) -> Result<ExprNode> {
    serde_json::from_str(json).context("Failed to parse expression tree")
}

/// Load an expression tree from a JSON file
pub fn load_tree(path: impl AsRef<Path>) -> Result<ExprNode> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read expression file '{}'", path.display()))?;
    parse_tree(&json).with_context(|| format!("Invalid expression file '{}'", path.display()))
}

/// Render a node as pretty-printed JSON
pub fn to_json(node: &ExprNode) -> Result<String> {
    serde_json::to_string_pretty(node).context("Failed to encode expression tree")
}
