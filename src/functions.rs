//! CSS function substitution.
//!
//! Compiled declarations may contain build-time functions, typically inside
//! arbitrary values such as `bg-[theme(--color-red-500/50%)]`. They are
//! replaced by plain CSS before output:
//!
//! | Function                          | Result                                   |
//! |-----------------------------------|------------------------------------------|
//! | `theme(path[, fallback])`         | the raw theme value                      |
//! | `--theme(--name[ inline][, fb])`  | `var(--name)`, or the raw value (inline) |
//! | `--alpha(color / alpha)`          | `color-mix(in oklab, color alpha, transparent)` |
//! | `--spacing(n)`                    | `calc(var(--spacing) * n)`               |
//!
//! Paths may carry an opacity modifier (`theme(colors.red.500 / 50%)`).
//! Arguments are substituted before the function that contains them.
//!
//! Substitution never mutates its input: it returns a new node or a
//! [`CompileError`].

use crate::ast::AstNode;
use crate::design_system::DesignSystem;
use crate::error::CompileError;
use crate::theme::with_alpha;
use crate::value::{self, ValueNode};

/// Substitutes functions in every declaration value and at-rule prelude below
/// `node`.
pub fn substitute_functions(node: &AstNode, ds: &DesignSystem) -> Result<AstNode, CompileError> {
    Ok(match node {
        AstNode::Rule { selector, nodes } => AstNode::Rule {
            selector: selector.clone(),
            nodes: substitute_all(nodes, ds)?,
        },
        AstNode::AtRule {
            name,
            params,
            nodes,
        } => AstNode::AtRule {
            name: name.clone(),
            params: substitute_value(params, ds)?,
            nodes: substitute_all(nodes, ds)?,
        },
        AstNode::Declaration {
            property,
            value,
            important,
        } => AstNode::Declaration {
            property: property.clone(),
            value: substitute_value(value, ds)?,
            important: *important,
        },
        AstNode::Comment { .. } => node.clone(),
    })
}

fn substitute_all(nodes: &[AstNode], ds: &DesignSystem) -> Result<Vec<AstNode>, CompileError> {
    nodes
        .iter()
        .map(|node| substitute_functions(node, ds))
        .collect()
}

/// Substitutes functions in one raw value.
pub fn substitute_value(raw: &str, ds: &DesignSystem) -> Result<String, CompileError> {
    if !raw.contains('(') {
        return Ok(raw.to_string());
    }
    let nodes = substitute_nodes(&value::parse(raw), ds)?;
    Ok(value::to_css(&nodes))
}

fn substitute_nodes(nodes: &[ValueNode], ds: &DesignSystem) -> Result<Vec<ValueNode>, CompileError> {
    nodes
        .iter()
        .map(|node| substitute_node(node, ds))
        .collect()
}

fn substitute_node(node: &ValueNode, ds: &DesignSystem) -> Result<ValueNode, CompileError> {
    let ValueNode::Function { name, nodes } = node else {
        return Ok(node.clone());
    };

    let args = substitute_nodes(nodes, ds)?;
    let replacement = match name.as_str() {
        "theme" => theme(&args, ds)?,
        "--theme" => custom_theme(&args, ds)?,
        "--alpha" => alpha(&args)?,
        "--spacing" => spacing(&args, ds)?,
        other if other.starts_with("--") => {
            return Err(CompileError::UnknownFunction(other.to_string()))
        }
        _ => return Ok(ValueNode::function(name.as_str(), args)),
    };
    Ok(ValueNode::word(replacement))
}

/// Splits arguments into the first one and the rest joined as a fallback.
fn path_and_fallback(args: &[ValueNode]) -> (String, Option<String>) {
    let mut parts = value::split_arguments(args).into_iter();
    let path = parts
        .next()
        .map(|nodes| value::to_css(&nodes))
        .unwrap_or_default();
    let fallback: Vec<String> = parts.map(|nodes| value::to_css(&nodes)).collect();
    let fallback = (!fallback.is_empty()).then(|| fallback.join(", "));
    (unquote(path.trim()).to_string(), fallback)
}

fn unquote(input: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = input
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    input
}

fn theme(args: &[ValueNode], ds: &DesignSystem) -> Result<String, CompileError> {
    let (path, fallback) = path_and_fallback(args);
    if path.is_empty() {
        return Err(CompileError::InvalidArguments {
            function: "theme",
            reason: "expected a theme path".to_string(),
        });
    }
    ds.resolve_theme_value(&path)
        .or(fallback)
        .ok_or(CompileError::UnresolvedThemeValue { path })
}

fn custom_theme(args: &[ValueNode], ds: &DesignSystem) -> Result<String, CompileError> {
    let (path, fallback) = path_and_fallback(args);
    let (path, inline) = match path.strip_suffix(" inline") {
        Some(path) => (path.trim_end().to_string(), true),
        None => (path, false),
    };
    let (name, modifier) = match path.rsplit_once('/') {
        Some((name, modifier)) => (name.trim(), Some(modifier.trim())),
        None => (path.trim(), None),
    };
    if !name.starts_with("--") {
        return Err(CompileError::InvalidArguments {
            function: "--theme",
            reason: format!("expected a custom property, found '{}'", name),
        });
    }

    let resolved = match ds.theme().get(name) {
        Some(value) if inline => value.to_string(),
        Some(_) => match &fallback {
            Some(fallback) => format!("var({}, {})", name, fallback),
            None => format!("var({})", name),
        },
        None => {
            return fallback.ok_or_else(|| CompileError::UnresolvedThemeValue {
                path: name.to_string(),
            })
        }
    };

    Ok(match modifier {
        Some(modifier) => with_alpha(&resolved, modifier),
        None => resolved,
    })
}

fn alpha(args: &[ValueNode]) -> Result<String, CompileError> {
    let raw = value::to_css(args);
    let invalid = || CompileError::InvalidArguments {
        function: "--alpha",
        reason: format!("expected 'color / alpha', found '{}'", raw.trim()),
    };
    let (color, alpha) = raw.rsplit_once('/').ok_or_else(invalid)?;
    let (color, alpha) = (color.trim(), alpha.trim());
    if color.is_empty() || alpha.is_empty() {
        return Err(invalid());
    }
    Ok(with_alpha(color, alpha))
}

fn spacing(args: &[ValueNode], ds: &DesignSystem) -> Result<String, CompileError> {
    let multiplier = value::to_css(args);
    let multiplier = multiplier.trim();
    if multiplier.is_empty() {
        return Err(CompileError::InvalidArguments {
            function: "--spacing",
            reason: "expected a multiplier".to_string(),
        });
    }
    if !ds.theme().contains("--spacing") {
        return Err(CompileError::UnresolvedThemeValue {
            path: "--spacing".to_string(),
        });
    }
    Ok(format!("calc(var(--spacing) * {})", multiplier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Theme;

    fn ds() -> DesignSystem {
        DesignSystem::new(
            Theme::new()
                .add("--color-red-500", "#ef4444")
                .add("--spacing", "0.25rem"),
        )
    }

    fn substitute(raw: &str) -> Result<String, CompileError> {
        substitute_value(raw, &ds())
    }

    #[test]
    fn test_plain_values_pass_through() {
        assert_eq!(substitute("1px solid red").unwrap(), "1px solid red");
        assert_eq!(substitute("var(--x, 1px)").unwrap(), "var(--x, 1px)");
    }

    #[test]
    fn test_theme_function() {
        assert_eq!(substitute("theme(--color-red-500)").unwrap(), "#ef4444");
        assert_eq!(substitute("theme(colors.red.500)").unwrap(), "#ef4444");
        assert_eq!(substitute("theme('colors.red.500')").unwrap(), "#ef4444");
        assert_eq!(
            substitute("1px solid theme(--color-red-500 / 50%)").unwrap(),
            "1px solid color-mix(in oklab, #ef4444 50%, transparent)"
        );
    }

    #[test]
    fn test_theme_function_fallback() {
        assert_eq!(
            substitute("theme(--color-blue-500, red, blue)").unwrap(),
            "red, blue"
        );
        assert_eq!(
            substitute("theme(--x)").unwrap_err(),
            CompileError::UnresolvedThemeValue {
                path: "--x".to_string()
            }
        );
    }

    #[test]
    fn test_custom_theme_function() {
        assert_eq!(
            substitute("--theme(--color-red-500)").unwrap(),
            "var(--color-red-500)"
        );
        assert_eq!(
            substitute("--theme(--color-red-500 inline)").unwrap(),
            "#ef4444"
        );
        assert_eq!(
            substitute("--theme(--color-red-500/50%)").unwrap(),
            "color-mix(in oklab, var(--color-red-500) 50%, transparent)"
        );
        assert_eq!(substitute("--theme(--missing, 4px)").unwrap(), "4px");
        assert!(matches!(
            substitute("--theme(colors.red)"),
            Err(CompileError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_alpha_function() {
        assert_eq!(
            substitute("--alpha(red / 25%)").unwrap(),
            "color-mix(in oklab, red 25%, transparent)"
        );
        assert!(matches!(
            substitute("--alpha(red)"),
            Err(CompileError::InvalidArguments { function: "--alpha", .. })
        ));
    }

    #[test]
    fn test_spacing_function() {
        assert_eq!(
            substitute("--spacing(4)").unwrap(),
            "calc(var(--spacing) * 4)"
        );
        let bare = DesignSystem::new(Theme::new());
        assert!(substitute_value("--spacing(4)", &bare).is_err());
    }

    #[test]
    fn test_nested_functions_resolve_inner_first() {
        assert_eq!(
            substitute("calc(theme(--spacing) * 2)").unwrap(),
            "calc(0.25rem * 2)"
        );
        assert_eq!(
            substitute("--alpha(theme(--color-red-500) / 50%)").unwrap(),
            "color-mix(in oklab, #ef4444 50%, transparent)"
        );
    }

    #[test]
    fn test_unknown_custom_function() {
        assert_eq!(
            substitute("--nope(1)").unwrap_err(),
            CompileError::UnknownFunction("--nope".to_string())
        );
    }

    #[test]
    fn test_substitute_functions_walks_tree() {
        let node = crate::ast::at_rule(
            "media",
            "(width >= theme(--breakpoint-md, 48rem))",
            vec![crate::ast::rule(
                ".a",
                vec![crate::ast::decl("color", "theme(--color-red-500)")],
            )],
        );
        let substituted = substitute_functions(&node, &ds()).unwrap();
        assert_eq!(
            substituted,
            crate::ast::at_rule(
                "media",
                "(width >= 48rem)",
                vec![crate::ast::rule(".a", vec![crate::ast::decl("color", "#ef4444")])],
            )
        );
    }
}
