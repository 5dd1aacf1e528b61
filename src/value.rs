//! Generic CSS value tokenizer.
//!
//! This module turns raw declaration values such as
//! `1px solid var(--color-border, currentcolor)` into a small tree of
//! [`ValueNode`]s:
//!
//! - [`ValueNode::Word`]: a run of non-separator tokens (`1px`, `--color-border`)
//! - [`ValueNode::Function`]: a function call or parenthesised group with its arguments
//! - [`ValueNode::Separator`]: whitespace and/or commas between words
//!
//! Tokenization is delegated to `cssparser`, but every node keeps the exact
//! source slice it came from, so [`to_css`] reproduces the input text for any
//! balanced value. Malformed input never fails; it simply yields fewer nodes.
//!
//! # Walking
//!
//! [`walk`] visits nodes depth-first. The visitor decides for each node
//! whether to descend into a function's arguments ([`WalkAction::Continue`]),
//! skip them ([`WalkAction::Skip`]) or abort the traversal ([`WalkAction::Stop`]).
//!
//! ```rust
//! use classcss::value::{self, ValueNode, WalkAction};
//!
//! let nodes = value::parse("var(--a, var(--b, red))");
//! let mut functions = 0;
//! value::walk(&nodes, |node| {
//!     if let ValueNode::Function { .. } = node {
//!         functions += 1;
//!     }
//!     WalkAction::Continue
//! });
//! assert_eq!(functions, 2);
//! ```

use cssparser::{Parser, ParserInput, Token};
use serde::Serialize;

/// A node in a tokenized CSS value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ValueNode {
    /// Adjacent non-separator tokens, kept as source text.
    Word { value: String },
    /// A function call. Parenthesised groups are functions with an empty name.
    Function { name: String, nodes: Vec<ValueNode> },
    /// Whitespace and commas between words, kept as source text.
    Separator { value: String },
}

impl ValueNode {
    /// Creates a word node.
    pub fn word(value: impl Into<String>) -> Self {
        ValueNode::Word {
            value: value.into(),
        }
    }

    /// Creates a function node.
    pub fn function(name: impl Into<String>, nodes: Vec<ValueNode>) -> Self {
        ValueNode::Function {
            name: name.into(),
            nodes,
        }
    }

    /// Returns the text of a word node.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            ValueNode::Word { value } => Some(value),
            _ => None,
        }
    }

    /// Returns `true` for separator nodes.
    pub fn is_separator(&self) -> bool {
        matches!(self, ValueNode::Separator { .. })
    }
}

/// What [`walk`] should do after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Descend into the node's children, then continue with its siblings.
    Continue,
    /// Do not descend into the node's children.
    Skip,
    /// Abort the whole traversal.
    Stop,
}

/// Tokenizes a raw CSS value.
pub fn parse(input: &str) -> Vec<ValueNode> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    parse_nodes(&mut parser)
}

fn parse_nodes(parser: &mut Parser<'_, '_>) -> Vec<ValueNode> {
    let mut nodes = Vec::new();

    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Function(name) => {
                let children = parser
                    .parse_nested_block::<_, _, ()>(|nested| Ok(parse_nodes(nested)))
                    .unwrap_or_default();
                nodes.push(ValueNode::function(name.to_string(), children));
            }
            Token::ParenthesisBlock => {
                let children = parser
                    .parse_nested_block::<_, _, ()>(|nested| Ok(parse_nodes(nested)))
                    .unwrap_or_default();
                nodes.push(ValueNode::function("", children));
            }
            Token::SquareBracketBlock | Token::CurlyBracketBlock => {
                // Kept opaque: the whole block becomes part of a word.
                let _ = parser.parse_nested_block::<_, _, ()>(|nested| {
                    while nested.next_including_whitespace_and_comments().is_ok() {}
                    Ok(())
                });
                push_word(&mut nodes, parser.slice_from(start));
            }
            Token::WhiteSpace(_) | Token::Comma => {
                push_separator(&mut nodes, parser.slice_from(start));
            }
            Token::Comment(_) => {}
            _ => push_word(&mut nodes, parser.slice_from(start)),
        }
    }

    nodes
}

fn push_word(nodes: &mut Vec<ValueNode>, text: &str) {
    if let Some(ValueNode::Word { value }) = nodes.last_mut() {
        value.push_str(text);
    } else {
        nodes.push(ValueNode::word(text));
    }
}

fn push_separator(nodes: &mut Vec<ValueNode>, text: &str) {
    if let Some(ValueNode::Separator { value }) = nodes.last_mut() {
        value.push_str(text);
    } else {
        nodes.push(ValueNode::Separator {
            value: text.to_string(),
        });
    }
}

/// Visits `nodes` depth-first, letting the visitor steer the traversal.
///
/// Returns [`WalkAction::Stop`] if the visitor aborted, otherwise
/// [`WalkAction::Continue`].
pub fn walk<F>(nodes: &[ValueNode], mut visit: F) -> WalkAction
where
    F: FnMut(&ValueNode) -> WalkAction,
{
    walk_inner(nodes, &mut visit)
}

fn walk_inner<F>(nodes: &[ValueNode], visit: &mut F) -> WalkAction
where
    F: FnMut(&ValueNode) -> WalkAction,
{
    for node in nodes {
        match visit(node) {
            WalkAction::Stop => return WalkAction::Stop,
            WalkAction::Skip => continue,
            WalkAction::Continue => {
                if let ValueNode::Function { nodes: children, .. } = node {
                    if walk_inner(children, visit) == WalkAction::Stop {
                        return WalkAction::Stop;
                    }
                }
            }
        }
    }
    WalkAction::Continue
}

/// Serializes nodes back to CSS text.
pub fn to_css(nodes: &[ValueNode]) -> String {
    let mut out = String::new();
    write_nodes(nodes, &mut out);
    out
}

fn write_nodes(nodes: &[ValueNode], out: &mut String) {
    for node in nodes {
        match node {
            ValueNode::Word { value } | ValueNode::Separator { value } => out.push_str(value),
            ValueNode::Function { name, nodes } => {
                out.push_str(name);
                out.push('(');
                write_nodes(nodes, out);
                out.push(')');
            }
        }
    }
}

/// Splits function arguments on top-level commas, trimming separators.
///
/// `a, b c` yields `[[a], [b, " ", c]]`.
pub fn split_arguments(nodes: &[ValueNode]) -> Vec<Vec<ValueNode>> {
    let mut args = vec![Vec::new()];
    for node in nodes {
        match node {
            ValueNode::Separator { value } if value.contains(',') => args.push(Vec::new()),
            other => {
                if let Some(current) = args.last_mut() {
                    current.push(other.clone());
                }
            }
        }
    }
    for arg in &mut args {
        while arg.first().is_some_and(ValueNode::is_separator) {
            arg.remove(0);
        }
        while arg.last().is_some_and(ValueNode::is_separator) {
            arg.pop();
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: &str) -> ValueNode {
        ValueNode::word(value)
    }

    fn sep(value: &str) -> ValueNode {
        ValueNode::Separator {
            value: value.to_string(),
        }
    }

    #[test]
    fn test_parse_words_and_separators() {
        let nodes = parse("1px solid red");
        assert_eq!(
            nodes,
            vec![word("1px"), sep(" "), word("solid"), sep(" "), word("red")]
        );
    }

    #[test]
    fn test_parse_nested_functions() {
        let nodes = parse("var(--a, var(--b, red))");
        assert_eq!(
            nodes,
            vec![ValueNode::function(
                "var",
                vec![
                    word("--a"),
                    sep(", "),
                    ValueNode::function("var", vec![word("--b"), sep(", "), word("red")]),
                ]
            )]
        );
    }

    #[test]
    fn test_parse_keeps_adjacent_tokens_in_one_word() {
        let nodes = parse("--color-red-500/50%");
        assert_eq!(nodes, vec![word("--color-red-500/50%")]);

        let nodes = parse("colors.red.500");
        assert_eq!(nodes, vec![word("colors.red.500")]);
    }

    #[test]
    fn test_round_trip_preserves_source() {
        for input in [
            "1px solid var(--x)",
            "calc(100% - 2rem)",
            "color-mix(in oklab, var(--color-red-500) 50%, transparent)",
            "\"Inter\", sans-serif",
            "#ff0000",
            "(width >= 40rem)",
        ] {
            assert_eq!(to_css(&parse(input)), input);
        }
    }

    #[test]
    fn test_parse_unclosed_function_is_closed() {
        assert_eq!(to_css(&parse("var(--a")), "var(--a)");
    }

    #[test]
    fn test_parse_drops_comments() {
        assert_eq!(to_css(&parse("red/* note */")), "red");
    }

    #[test]
    fn test_walk_skip_does_not_descend() {
        let nodes = parse("var(--a, var(--b))");
        let mut seen = Vec::new();
        walk(&nodes, |node| {
            if let ValueNode::Function { name, .. } = node {
                seen.push(name.clone());
                return WalkAction::Skip;
            }
            WalkAction::Continue
        });
        assert_eq!(seen, vec!["var".to_string()]);
    }

    #[test]
    fn test_walk_stop_aborts() {
        let nodes = parse("a b c");
        let mut visited = 0;
        let action = walk(&nodes, |node| {
            visited += 1;
            if node.as_word() == Some("b") {
                WalkAction::Stop
            } else {
                WalkAction::Continue
            }
        });
        assert_eq!(action, WalkAction::Stop);
        assert_eq!(visited, 3);
    }

    #[test]
    fn test_split_arguments() {
        let nodes = parse("--x, red 50%");
        let args = split_arguments(&nodes);
        assert_eq!(args.len(), 2);
        assert_eq!(to_css(&args[0]), "--x");
        assert_eq!(to_css(&args[1]), "red 50%");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
        assert!(split_arguments(&[]).iter().all(Vec::is_empty));
    }
}
