//! AST optimization.

use super::AstNode;

/// Optimizes a list of nodes.
///
/// - Rules and at-rules without children are removed
/// - Within a container, a declaration identical to a later one is removed
/// - Adjacent rules with the same selector, and adjacent at-rules with the
///   same name and params, are merged
///
/// The pass is total and never reorders non-adjacent nodes.
pub fn optimize_ast(nodes: Vec<AstNode>) -> Vec<AstNode> {
    let mut out: Vec<(AstNode, bool)> = Vec::with_capacity(nodes.len());

    for node in nodes {
        let node = optimize_children(node);
        if node.children().is_some_and(<[AstNode]>::is_empty) {
            continue;
        }

        if let Some((last, absorbed)) = out.last_mut() {
            if same_container(last, &node) {
                absorb(last, node);
                *absorbed = true;
                continue;
            }
        }
        out.push((node, false));
    }

    // Merged containers may now hold adjacent siblings that merge as well.
    let out = out
        .into_iter()
        .map(|(node, absorbed)| {
            if absorbed {
                optimize_children(node)
            } else {
                node
            }
        })
        .collect();

    dedupe_declarations(out)
}

fn optimize_children(node: AstNode) -> AstNode {
    match node {
        AstNode::Rule { selector, nodes } => AstNode::Rule {
            selector,
            nodes: optimize_ast(nodes),
        },
        AstNode::AtRule {
            name,
            params,
            nodes,
        } => AstNode::AtRule {
            name,
            params,
            nodes: optimize_ast(nodes),
        },
        other => other,
    }
}

fn same_container(a: &AstNode, b: &AstNode) -> bool {
    match (a, b) {
        (AstNode::Rule { selector: a, .. }, AstNode::Rule { selector: b, .. }) => a == b,
        (
            AstNode::AtRule {
                name: a, params: p, ..
            },
            AstNode::AtRule {
                name: b, params: q, ..
            },
        ) => a == b && p == q,
        _ => false,
    }
}

fn absorb(target: &mut AstNode, other: AstNode) {
    if let (
        AstNode::Rule { nodes: into, .. } | AstNode::AtRule { nodes: into, .. },
        AstNode::Rule { nodes, .. } | AstNode::AtRule { nodes, .. },
    ) = (target, other)
    {
        into.extend(nodes);
    }
}

fn dedupe_declarations(nodes: Vec<AstNode>) -> Vec<AstNode> {
    let mut keep = vec![true; nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        if !matches!(node, AstNode::Declaration { .. }) {
            continue;
        }
        if nodes[i + 1..].iter().any(|later| later == node) {
            keep[i] = false;
        }
    }
    nodes
        .into_iter()
        .zip(keep)
        .filter_map(|(node, keep)| keep.then_some(node))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{at_rule, decl, rule};

    #[test]
    fn test_removes_empty_containers() {
        let nodes = vec![
            rule(".empty", vec![]),
            at_rule("media", "print", vec![rule(".also-empty", vec![])]),
            rule(".a", vec![decl("color", "red")]),
        ];
        assert_eq!(
            optimize_ast(nodes),
            vec![rule(".a", vec![decl("color", "red")])]
        );
    }

    #[test]
    fn test_dedupes_declarations_keeping_last() {
        let nodes = vec![rule(
            ".a",
            vec![
                decl("color", "red"),
                decl("margin", "0"),
                decl("color", "red"),
            ],
        )];
        assert_eq!(
            optimize_ast(nodes),
            vec![rule(".a", vec![decl("margin", "0"), decl("color", "red")])]
        );
    }

    #[test]
    fn test_keeps_distinct_declarations_of_same_property() {
        let nodes = vec![rule(".a", vec![decl("color", "red"), decl("color", "blue")])];
        assert_eq!(optimize_ast(nodes.clone()), nodes);
    }

    #[test]
    fn test_merges_adjacent_at_rules() {
        let nodes = vec![
            at_rule("media", "(width >= 40rem)", vec![rule(".a", vec![decl("x", "1")])]),
            at_rule("media", "(width >= 40rem)", vec![rule(".b", vec![decl("y", "2")])]),
            rule(".c", vec![decl("z", "3")]),
        ];
        assert_eq!(
            optimize_ast(nodes),
            vec![
                at_rule(
                    "media",
                    "(width >= 40rem)",
                    vec![
                        rule(".a", vec![decl("x", "1")]),
                        rule(".b", vec![decl("y", "2")]),
                    ]
                ),
                rule(".c", vec![decl("z", "3")]),
            ]
        );
    }

    #[test]
    fn test_merges_nested_rules_after_at_rule_merge() {
        let nodes = vec![
            at_rule("media", "print", vec![rule(".a", vec![decl("x", "1")])]),
            at_rule("media", "print", vec![rule(".a", vec![decl("y", "2")])]),
        ];
        assert_eq!(
            optimize_ast(nodes),
            vec![at_rule(
                "media",
                "print",
                vec![rule(".a", vec![decl("x", "1"), decl("y", "2")])]
            )]
        );
    }

    #[test]
    fn test_does_not_merge_non_adjacent() {
        let nodes = vec![
            rule(".a", vec![decl("x", "1")]),
            rule(".b", vec![decl("y", "2")]),
            rule(".a", vec![decl("z", "3")]),
        ];
        assert_eq!(optimize_ast(nodes.clone()), nodes);
    }
}
