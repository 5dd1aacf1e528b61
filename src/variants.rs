//! Variant registry.
//!
//! Variants wrap a compiled utility rule: selector variants rewrite the rule's
//! selector (`&:hover`), at-rule variants wrap it (`@media (width >= 48rem)`).
//!
//! Registration order is significant: it defines how variants rank against
//! each other in [`Variants::compare`], which in turn decides where utilities
//! with variants land in the generated stylesheet. Variants registered inside
//! one [`Variants::group`] call share a rank; breakpoints are grouped and
//! then ordered by their width.
//!
//! # Example
//!
//! ```rust
//! use classcss::variants::{Applicator, Variants};
//!
//! let mut variants = Variants::new();
//! variants.static_variant("hover", Applicator::selector("&:hover"));
//! variants.static_variant("print", Applicator::at_rule("media", "print"));
//!
//! assert!(variants.kind("hover").is_some());
//! ```

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;

use crate::ast::{self, AstNode};
use crate::candidate::{CandidateValue, Variant};
use crate::theme::Theme;

/// How a variant changes a compiled rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicator {
    /// Rewrites selectors; `&` stands for the original selector.
    Selector(String),
    /// Wraps the node in an at-rule.
    AtRule { name: String, params: String },
}

impl Applicator {
    /// Creates a selector applicator.
    pub fn selector(pattern: impl Into<String>) -> Self {
        Applicator::Selector(pattern.into())
    }

    /// Creates an at-rule applicator.
    pub fn at_rule(name: impl Into<String>, params: impl Into<String>) -> Self {
        Applicator::AtRule {
            name: name.into(),
            params: params.into(),
        }
    }

    /// Applies the variant to a node.
    ///
    /// Selector applicators rewrite every rule selector below `node`, so they
    /// work on rules already wrapped in at-rules.
    pub fn apply(&self, node: AstNode) -> AstNode {
        match self {
            Applicator::AtRule { name, params } => {
                ast::at_rule(name.as_str(), params.as_str(), vec![node])
            }
            Applicator::Selector(pattern) => rewrite_selectors(node, pattern),
        }
    }

    fn is_selector(&self) -> bool {
        matches!(self, Applicator::Selector(_))
    }
}

fn rewrite_selectors(node: AstNode, pattern: &str) -> AstNode {
    match node {
        AstNode::Rule { selector, nodes } => AstNode::Rule {
            selector: pattern.replace('&', &selector),
            nodes,
        },
        AstNode::AtRule {
            name,
            params,
            nodes,
        } => AstNode::AtRule {
            name,
            params,
            nodes: nodes
                .into_iter()
                .map(|child| rewrite_selectors(child, pattern))
                .collect(),
        },
        other => other,
    }
}

/// Builds the applicator of a functional variant from its value.
pub type FunctionalVariant = fn(&CandidateValue) -> Option<Applicator>;

/// Variants that wrap another variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compound {
    /// `group-*`: matches when an ancestor `.group` is in the inner state.
    Group,
    /// `peer-*`: matches when a preceding sibling `.peer` is in the inner state.
    Peer,
    /// `not-*`: negates the inner variant.
    Not,
}

/// The shape of a registered variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Static,
    Functional,
    Compound,
}

#[derive(Clone)]
enum Definition {
    Static(Applicator),
    Functional(FunctionalVariant),
    Compound(Compound),
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Static(applicator) => f.debug_tuple("Static").field(applicator).finish(),
            Definition::Functional(_) => f.write_str("Functional(..)"),
            Definition::Compound(compound) => f.debug_tuple("Compound").field(compound).finish(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    definition: Definition,
    order: usize,
    sort_key: Option<f64>,
}

/// Ordered registry of variants.
#[derive(Debug, Clone, Default)]
pub struct Variants {
    entries: IndexMap<String, Entry>,
    next_order: usize,
    grouping: bool,
}

impl Variants {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, name: &str, definition: Definition, sort_key: Option<f64>) {
        let order = self.next_order;
        if !self.grouping {
            self.next_order += 1;
        }
        self.entries.insert(
            name.to_string(),
            Entry {
                definition,
                order,
                sort_key,
            },
        );
    }

    /// Registers a variant with a fixed applicator.
    pub fn static_variant(&mut self, name: &str, applicator: Applicator) {
        self.register(name, Definition::Static(applicator), None);
    }

    /// Registers a static variant with a secondary sort key.
    ///
    /// Within one rank, lower keys sort first.
    pub fn static_variant_sorted(&mut self, name: &str, applicator: Applicator, sort_key: f64) {
        self.register(name, Definition::Static(applicator), Some(sort_key));
    }

    /// Registers a variant that takes a value (`data-[open]`).
    pub fn functional(&mut self, name: &str, build: FunctionalVariant) {
        self.register(name, Definition::Functional(build), None);
    }

    /// Registers a variant that wraps another variant (`group-hover`).
    pub fn compound(&mut self, name: &str, compound: Compound) {
        self.register(name, Definition::Compound(compound), None);
    }

    /// Registers several variants that share one rank.
    pub fn group(&mut self, register: impl FnOnce(&mut Self)) {
        let order = self.next_order;
        self.grouping = true;
        register(self);
        self.grouping = false;
        self.next_order = order + 1;
    }

    /// Returns the kind of variant registered under `root`.
    pub fn kind(&self, root: &str) -> Option<VariantKind> {
        self.entries
            .get(root)
            .map(|entry| match entry.definition {
                Definition::Static(_) => VariantKind::Static,
                Definition::Functional(_) => VariantKind::Functional,
                Definition::Compound(_) => VariantKind::Compound,
            })
    }

    /// Returns `true` if the compound variant `root` can wrap `inner`.
    ///
    /// `group` and `peer` need a selector variant; `not` takes anything that
    /// applies.
    pub fn compounds_with(&self, root: &str, inner: &Variant) -> bool {
        let Some(Entry {
            definition: Definition::Compound(compound),
            ..
        }) = self.entries.get(root)
        else {
            return false;
        };
        match (compound, self.applicator(inner)) {
            (_, None) => false,
            (Compound::Not, Some(_)) => true,
            (_, Some(applicator)) => applicator.is_selector(),
        }
    }

    /// Resolves the applicator for a parsed variant.
    pub fn applicator(&self, variant: &Variant) -> Option<Applicator> {
        match variant {
            Variant::Arbitrary { selector } => Some(arbitrary_applicator(selector)),
            Variant::Static { root } => match &self.entries.get(root)?.definition {
                Definition::Static(applicator) => Some(applicator.clone()),
                _ => None,
            },
            Variant::Functional { root, value } => match self.entries.get(root)?.definition {
                Definition::Functional(build) => build(value),
                _ => None,
            },
            Variant::Compound { root, variant } => {
                let Definition::Compound(compound) = self.entries.get(root)?.definition else {
                    return None;
                };
                compound_applicator(compound, self.applicator(variant)?)
            }
        }
    }

    /// Total preorder over variants.
    ///
    /// Ranks by registration order, then by the wrapped variant for
    /// compounds, then by sort key, then by root. Functional variants with
    /// the same root compare equal regardless of value. Arbitrary variants
    /// sort after all registered ones.
    pub fn compare(&self, a: &Variant, b: &Variant) -> Ordering {
        match (a, b) {
            (Variant::Arbitrary { selector: x }, Variant::Arbitrary { selector: y }) => x.cmp(y),
            (Variant::Arbitrary { .. }, _) => Ordering::Greater,
            (_, Variant::Arbitrary { .. }) => Ordering::Less,
            _ => {
                let (order_a, key_a) = self.rank(a.root());
                let (order_b, key_b) = self.rank(b.root());
                order_a
                    .cmp(&order_b)
                    .then_with(|| match (a, b) {
                        (
                            Variant::Compound { variant: x, .. },
                            Variant::Compound { variant: y, .. },
                        ) => self.compare(x, y),
                        _ => Ordering::Equal,
                    })
                    .then_with(|| match (key_a, key_b) {
                        (Some(x), Some(y)) => x.total_cmp(&y),
                        (Some(_), None) => Ordering::Less,
                        (None, Some(_)) => Ordering::Greater,
                        (None, None) => Ordering::Equal,
                    })
                    .then_with(|| a.root().cmp(b.root()))
            }
        }
    }

    fn rank(&self, root: &str) -> (usize, Option<f64>) {
        self.entries
            .get(root)
            .map_or((usize::MAX, None), |entry| (entry.order, entry.sort_key))
    }

    /// The built-in variant set. Breakpoints come from `--breakpoint-*`
    /// tokens of `theme`.
    pub fn standard(theme: &Theme) -> Self {
        let mut variants = Self::new();

        variants.compound("group", Compound::Group);
        variants.compound("peer", Compound::Peer);
        variants.compound("not", Compound::Not);

        for (name, pattern) in [
            ("first", "&:first-child"),
            ("last", "&:last-child"),
            ("odd", "&:nth-child(odd)"),
            ("even", "&:nth-child(even)"),
            ("open", "&:is([open], :popover-open)"),
            ("hover", "&:hover"),
            ("focus", "&:focus"),
            ("focus-within", "&:focus-within"),
            ("focus-visible", "&:focus-visible"),
            ("active", "&:active"),
            ("disabled", "&:disabled"),
        ] {
            variants.static_variant(name, Applicator::selector(pattern));
        }

        variants.functional("aria", |value| {
            Some(Applicator::Selector(match value {
                CandidateValue::Named(name) => format!("&[aria-{}=\"true\"]", name),
                CandidateValue::Arbitrary(raw) => format!("&[aria-{}]", raw),
            }))
        });
        variants.functional("data", |value| {
            Some(Applicator::Selector(format!("&[data-{}]", value.as_str())))
        });
        variants.functional("supports", |value| {
            let condition = value.as_str();
            let params = if condition.contains(':') || condition.starts_with('(') {
                if condition.starts_with('(') {
                    condition.to_string()
                } else {
                    format!("({})", condition)
                }
            } else {
                format!("({}: var(--tw))", condition)
            };
            Some(Applicator::at_rule("supports", params))
        });

        let breakpoints: Vec<(String, String)> = theme
            .namespace("--breakpoint")
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        variants.group(|group| {
            for (name, width) in &breakpoints {
                let applicator = Applicator::at_rule("media", format!("(width >= {})", width));
                match width_in_pixels(width) {
                    Some(px) => group.static_variant_sorted(name, applicator, px),
                    None => group.static_variant(name, applicator),
                }
            }
        });

        variants.functional("min", |value| match value {
            CandidateValue::Arbitrary(width) => {
                Some(Applicator::at_rule("media", format!("(width >= {})", width)))
            }
            CandidateValue::Named(_) => None,
        });
        variants.functional("max", |value| match value {
            CandidateValue::Arbitrary(width) => {
                Some(Applicator::at_rule("media", format!("(width < {})", width)))
            }
            CandidateValue::Named(_) => None,
        });

        variants.static_variant(
            "motion-reduce",
            Applicator::at_rule("media", "(prefers-reduced-motion: reduce)"),
        );
        variants.static_variant(
            "dark",
            Applicator::at_rule("media", "(prefers-color-scheme: dark)"),
        );
        variants.static_variant("print", Applicator::at_rule("media", "print"));
        variants.static_variant("placeholder", Applicator::selector("&::placeholder"));
        variants.static_variant("before", Applicator::selector("&::before"));
        variants.static_variant("after", Applicator::selector("&::after"));

        variants
    }
}

fn arbitrary_applicator(selector: &str) -> Applicator {
    match selector.strip_prefix('@') {
        Some(rule) => {
            let (name, params) = rule.split_once(' ').unwrap_or((rule, ""));
            Applicator::at_rule(name, params.trim())
        }
        None => Applicator::Selector(selector.to_string()),
    }
}

fn compound_applicator(compound: Compound, inner: Applicator) -> Option<Applicator> {
    match (compound, inner) {
        (Compound::Group, Applicator::Selector(pattern)) => Some(Applicator::Selector(format!(
            "&:is({} *)",
            pattern.replace('&', ":where(.group)")
        ))),
        (Compound::Peer, Applicator::Selector(pattern)) => Some(Applicator::Selector(format!(
            "&:is({} ~ *)",
            pattern.replace('&', ":where(.peer)")
        ))),
        (Compound::Not, Applicator::Selector(pattern)) => Some(Applicator::Selector(format!(
            "&:not({})",
            pattern.replace('&', "*")
        ))),
        (Compound::Not, Applicator::AtRule { name, params }) => Some(Applicator::AtRule {
            name,
            params: format!("not {}", params),
        }),
        (Compound::Group | Compound::Peer, Applicator::AtRule { .. }) => None,
    }
}

fn width_in_pixels(width: &str) -> Option<f64> {
    let width = width.trim();
    let (number, scale) = if let Some(n) = width.strip_suffix("rem") {
        (n, 16.0)
    } else if let Some(n) = width.strip_suffix("em") {
        (n, 16.0)
    } else if let Some(n) = width.strip_suffix("px") {
        (n, 1.0)
    } else {
        return None;
    };
    number.trim().parse::<f64>().ok().map(|n| n * scale)
}
