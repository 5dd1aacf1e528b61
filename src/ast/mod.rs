//! CSS abstract syntax tree.
//!
//! Compiled utilities are represented as a small tree of [`AstNode`]s before
//! being turned into text:
//!
//! - [`optimize_ast`]: drops empty containers, removes duplicate declarations
//!   and merges adjacent identical rules and at-rules
//! - [`to_css`]: prints nodes as two-space-indented CSS
//!
//! Nodes derive `Serialize`, so compiled output can also be inspected as JSON.
//!
//! # Example
//!
//! ```rust
//! use classcss::ast::{self, at_rule, decl, rule};
//!
//! let nodes = vec![at_rule(
//!     "media",
//!     "(width >= 40rem)",
//!     vec![rule(".sm\\:flex", vec![decl("display", "flex")])],
//! )];
//!
//! assert_eq!(
//!     ast::to_css(&nodes),
//!     "@media (width >= 40rem) {\n  .sm\\:flex {\n    display: flex;\n  }\n}\n"
//! );
//! ```

mod optimize;
mod serialize;

use serde::Serialize;

pub use optimize::optimize_ast;
pub use serialize::to_css;

/// A node of the CSS tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AstNode {
    /// A style rule: `selector { nodes }`.
    Rule { selector: String, nodes: Vec<AstNode> },
    /// An at-rule: `@name params { nodes }`, or `@name params;` without nodes.
    AtRule {
        name: String,
        params: String,
        nodes: Vec<AstNode>,
    },
    /// A declaration: `property: value`.
    Declaration {
        property: String,
        value: String,
        important: bool,
    },
    /// A comment, printed as `/*value*/`.
    Comment { value: String },
}

impl AstNode {
    /// Returns the child nodes of a rule or at-rule.
    pub fn children(&self) -> Option<&[AstNode]> {
        match self {
            AstNode::Rule { nodes, .. } | AstNode::AtRule { nodes, .. } => Some(nodes),
            _ => None,
        }
    }

    /// Visits every declaration in this subtree.
    pub fn for_each_declaration<F>(&self, visit: &mut F)
    where
        F: FnMut(&str, &str),
    {
        match self {
            AstNode::Declaration {
                property, value, ..
            } => visit(property, value),
            AstNode::Rule { nodes, .. } | AstNode::AtRule { nodes, .. } => {
                for node in nodes {
                    node.for_each_declaration(visit);
                }
            }
            AstNode::Comment { .. } => {}
        }
    }
}

/// Creates a style rule.
pub fn rule(selector: impl Into<String>, nodes: Vec<AstNode>) -> AstNode {
    AstNode::Rule {
        selector: selector.into(),
        nodes,
    }
}

/// Creates an at-rule.
pub fn at_rule(name: impl Into<String>, params: impl Into<String>, nodes: Vec<AstNode>) -> AstNode {
    AstNode::AtRule {
        name: name.into(),
        params: params.into(),
        nodes,
    }
}

/// Creates a declaration.
pub fn decl(property: impl Into<String>, value: impl Into<String>) -> AstNode {
    AstNode::Declaration {
        property: property.into(),
        value: value.into(),
        important: false,
    }
}

/// Creates a comment.
pub fn comment(value: impl Into<String>) -> AstNode {
    AstNode::Comment {
        value: value.into(),
    }
}
