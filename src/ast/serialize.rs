//! CSS text output.

use super::AstNode;

/// Prints nodes as CSS, indenting nested blocks by two spaces.
///
/// Every top-level node ends with a newline.
pub fn to_css(nodes: &[AstNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, 0, &mut out);
    }
    out
}

fn write_node(node: &AstNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);

    match node {
        AstNode::Rule { selector, nodes } => {
            out.push_str(&format!("{}{} {{\n", indent, selector));
            for child in nodes {
                write_node(child, depth + 1, out);
            }
            out.push_str(&format!("{}}}\n", indent));
        }
        AstNode::AtRule {
            name,
            params,
            nodes,
        } => {
            let head = if params.is_empty() {
                format!("{}@{}", indent, name)
            } else {
                format!("{}@{} {}", indent, name, params)
            };
            if nodes.is_empty() {
                out.push_str(&format!("{};\n", head));
                return;
            }
            out.push_str(&format!("{} {{\n", head));
            for child in nodes {
                write_node(child, depth + 1, out);
            }
            out.push_str(&format!("{}}}\n", indent));
        }
        AstNode::Declaration {
            property,
            value,
            important,
        } => {
            let important = if *important { " !important" } else { "" };
            out.push_str(&format!("{}{}: {}{};\n", indent, property, value, important));
        }
        AstNode::Comment { value } => {
            out.push_str(&format!("{}/*{}*/\n", indent, value));
        }
    }
}
