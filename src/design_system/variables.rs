use indexmap::IndexSet;

use crate::value::{self, ValueNode, WalkAction};

/// Returns the custom properties referenced through `var()` in a raw value,
/// each once, in source order.
///
/// Fallback arguments are scanned too, so `var(--a, var(--b, red))` yields
/// `--a` and `--b`.
///
/// ```rust
/// use classcss::design_system::referenced_variables;
///
/// assert_eq!(
///     referenced_variables("var(--a, var(--b, red)) var(--a)"),
///     vec!["--a".to_string(), "--b".to_string()]
/// );
/// ```
pub fn referenced_variables(raw: &str) -> Vec<String> {
    let nodes = value::parse(raw);
    let mut names = IndexSet::new();

    value::walk(&nodes, |node| {
        let ValueNode::Function { name, nodes: args } = node else {
            return WalkAction::Continue;
        };
        if name != "var" {
            return WalkAction::Continue;
        }
        value::walk(args, |arg| {
            if let Some(word) = arg.as_word() {
                if word.starts_with("--") {
                    names.insert(word.to_string());
                }
            }
            WalkAction::Continue
        });
        // The arguments were scanned above.
        WalkAction::Skip
    });

    names.into_iter().collect()
}
