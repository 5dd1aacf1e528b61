//! Candidate compilation and ordering.
//!
//! [`compile_ast_nodes`] turns one parsed candidate into a rule:
//!
//! 1. The base utility produces declarations (see [`crate::utilities`]).
//! 2. Declarations are marked `!important` if the candidate or the design
//!    system asks for it.
//! 3. The declarations are wrapped in a rule selecting the escaped class name.
//! 4. Variants are applied innermost first.
//!
//! [`compile_candidates`] compiles a batch of class names and sorts the
//! resulting rules so that the stylesheet is deterministic: rules without
//! variants first, then by variant rank, then by the position of their
//! properties in a fixed property order, then by class name.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::ast::{self, AstNode};
use crate::candidate::Candidate;
use crate::design_system::DesignSystem;

/// Canonical property order. Utilities setting earlier properties sort first.
const PROPERTY_ORDER: &[&str] = &[
    "position",
    "z-index",
    "margin",
    "margin-inline",
    "margin-block",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "display",
    "width",
    "height",
    "gap",
    "overflow",
    "text-overflow",
    "white-space",
    "border-radius",
    "border-width",
    "border-color",
    "background-color",
    "padding",
    "padding-inline",
    "padding-block",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "font-family",
    "font-size",
    "line-height",
    "font-weight",
    "color",
    "text-transform",
    "font-style",
    "text-decoration-line",
    "opacity",
    "box-shadow",
];

static PROPERTY_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    PROPERTY_ORDER
        .iter()
        .enumerate()
        .map(|(index, property)| (*property, index))
        .collect()
});

/// Sort metadata derived from the declarations of a compiled rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySort {
    /// Known property positions, ascending.
    pub order: Vec<usize>,
    /// Number of declarations.
    pub count: usize,
}

impl PropertySort {
    /// Computes the sort metadata for a list of declarations.
    pub fn from_declarations(declarations: &[AstNode]) -> Self {
        let mut order = Vec::new();
        let mut count = 0;
        for node in declarations {
            node.for_each_declaration(&mut |property, _| {
                count += 1;
                if let Some(index) = PROPERTY_INDEX.get(property) {
                    order.push(*index);
                }
            });
        }
        order.sort_unstable();
        order.dedup();
        Self { order, count }
    }
}

/// A compiled rule and its sort metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledNode {
    pub node: AstNode,
    pub property_sort: PropertySort,
}

/// Compiles one candidate into rules.
///
/// Returns an empty list when the utility cannot be resolved or any of its
/// variants is unknown.
pub fn compile_ast_nodes(candidate: &Candidate, ds: &DesignSystem) -> Vec<CompiledNode> {
    let Some(mut declarations) = ds.utilities().compile(&candidate.kind, ds.theme()) else {
        return Vec::new();
    };
    if declarations.is_empty() {
        return Vec::new();
    }

    if candidate.important || ds.is_important() {
        for node in &mut declarations {
            if let AstNode::Declaration { important, .. } = node {
                *important = true;
            }
        }
    }

    let property_sort = PropertySort::from_declarations(&declarations);
    let mut node = ast::rule(class_selector(&candidate.raw), declarations);

    for variant in &candidate.variants {
        match ds.variants().applicator(variant) {
            Some(applicator) => node = applicator.apply(node),
            None => return Vec::new(),
        }
    }

    vec![CompiledNode {
        node,
        property_sort,
    }]
}

/// `.` followed by the class name escaped as a CSS identifier.
pub fn class_selector(class: &str) -> String {
    let mut selector = String::from(".");
    if cssparser::serialize_identifier(class, &mut selector).is_err() {
        selector.truncate(1);
        selector.push_str(class);
    }
    selector
}

/// The set of variant ranks used by a candidate, compared like a bitmask.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantMask(BTreeSet<usize>);

impl VariantMask {
    pub fn insert(&mut self, group: usize) {
        self.0.insert(group);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Ord for VariantMask {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut a = self.0.iter().rev();
        let mut b = other.0.iter().rev();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some(x), Some(y)) if x == y => continue,
                (Some(x), Some(y)) => return x.cmp(y),
            }
        }
    }
}

impl PartialOrd for VariantMask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key of one compiled rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSorting {
    pub properties: PropertySort,
    pub variants: VariantMask,
    /// The class name the rule was compiled from.
    pub candidate: String,
}

impl NodeSorting {
    fn compare(&self, other: &Self) -> Ordering {
        self.variants
            .cmp(&other.variants)
            .then_with(|| compare_property_order(&self.properties.order, &other.properties.order))
            .then_with(|| other.properties.count.cmp(&self.properties.count))
            .then_with(|| self.candidate.cmp(&other.candidate))
    }
}

fn compare_property_order(a: &[usize], b: &[usize]) -> Ordering {
    for index in 0..a.len().max(b.len()) {
        let x = a.get(index).copied().unwrap_or(usize::MAX);
        let y = b.get(index).copied().unwrap_or(usize::MAX);
        if x != y {
            return x.cmp(&y);
        }
    }
    Ordering::Equal
}

/// Sorted output of [`compile_candidates`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledCandidates {
    pub ast_nodes: Vec<AstNode>,
    /// Sort keys, parallel to `ast_nodes`.
    pub sorting: Vec<NodeSorting>,
}

/// Compiles class names into sorted rules.
///
/// `on_invalid` is called once for every distinct class name that is in the
/// invalid-candidate set, does not parse, or parses only into candidates that
/// produce no output.
pub fn compile_candidates<S, F>(
    classes: &[S],
    ds: &DesignSystem,
    mut on_invalid: F,
) -> CompiledCandidates
where
    S: AsRef<str>,
    F: FnMut(&str),
{
    let unique: IndexSet<&str> = classes.iter().map(AsRef::as_ref).collect();

    let mut parsed = Vec::with_capacity(unique.len());
    for class in unique {
        if ds.is_invalid_candidate(class) {
            on_invalid(class);
            continue;
        }
        let candidates = ds.parse_candidate_cached(class);
        if candidates.is_empty() {
            debug!(class, "class does not parse");
            on_invalid(class);
            continue;
        }
        parsed.push((class, candidates));
    }

    // Every variant of the batch is parsed by now.
    let variant_order = ds.variant_order();

    let mut entries = Vec::new();
    for (class, candidates) in parsed {
        let mut found = false;
        for candidate in candidates.iter() {
            let compiled = ds.compile_cached(candidate);
            if compiled.is_empty() {
                continue;
            }
            found = true;

            let mut variants = VariantMask::default();
            for variant in &candidate.variants {
                if let Some(group) = variant_order.get(variant) {
                    variants.insert(group);
                }
            }

            for compiled_node in compiled.iter() {
                entries.push((
                    compiled_node.node.clone(),
                    NodeSorting {
                        properties: compiled_node.property_sort.clone(),
                        variants: variants.clone(),
                        candidate: class.to_string(),
                    },
                ));
            }
        }
        if !found {
            debug!(class, "class produces no output");
            on_invalid(class);
        }
    }

    entries.sort_by(|(_, a), (_, b)| a.compare(b));
    let (ast_nodes, sorting) = entries.into_iter().unzip();
    CompiledCandidates { ast_nodes, sorting }
}

/// Returns each class name with its position in the generated stylesheet,
/// or `None` if it produces no output.
pub fn get_class_order<S: AsRef<str>>(
    classes: &[S],
    ds: &DesignSystem,
) -> Vec<(String, Option<u64>)> {
    let compiled = compile_candidates(classes, ds, |_| {});

    let mut positions: IndexMap<&str, u64> = IndexMap::new();
    for sorting in &compiled.sorting {
        let next = positions.len() as u64;
        positions.entry(sorting.candidate.as_str()).or_insert(next);
    }

    classes
        .iter()
        .map(|class| {
            let class = class.as_ref();
            (class.to_string(), positions.get(class).copied())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Theme;

    fn ds() -> DesignSystem {
        DesignSystem::new(
            Theme::new()
                .add("--color-red-500", "#ef4444")
                .add("--spacing", "0.25rem")
                .add("--breakpoint-md", "48rem"),
        )
    }

    fn compile_one(class: &str, ds: &DesignSystem) -> Vec<AstNode> {
        ds.parse_candidate_cached(class)
            .iter()
            .flat_map(|candidate| compile_ast_nodes(candidate, ds))
            .map(|compiled| compiled.node)
            .collect()
    }

    #[test]
    fn test_class_selector_escapes() {
        assert_eq!(class_selector("flex"), ".flex");
        assert_eq!(class_selector("md:flex"), ".md\\:flex");
        assert_eq!(class_selector("bg-red-500/50"), ".bg-red-500\\/50");
        assert_eq!(class_selector("w-[42px]"), ".w-\\[42px\\]");
    }

    #[test]
    fn test_compile_applies_variants_innermost_first() {
        let ds = ds();
        assert_eq!(
            compile_one("md:hover:flex", &ds),
            vec![ast::at_rule(
                "media",
                "(width >= 48rem)",
                vec![ast::rule(
                    ".md\\:hover\\:flex:hover",
                    vec![ast::decl("display", "flex")]
                )]
            )]
        );
    }

    #[test]
    fn test_compile_important() {
        let ds = ds();
        assert_eq!(
            compile_one("flex!", &ds),
            vec![ast::rule(
                ".flex\\!",
                vec![AstNode::Declaration {
                    property: "display".to_string(),
                    value: "flex".to_string(),
                    important: true,
                }]
            )]
        );
    }

    #[test]
    fn test_compile_design_system_important() {
        let ds = DesignSystem::builder().important(true).build();
        assert_eq!(
            compile_one("block", &ds),
            vec![ast::rule(
                ".block",
                vec![AstNode::Declaration {
                    property: "display".to_string(),
                    value: "block".to_string(),
                    important: true,
                }]
            )]
        );
    }

    #[test]
    fn test_property_sort() {
        let sort = PropertySort::from_declarations(&[
            ast::decl("white-space", "nowrap"),
            ast::decl("overflow", "hidden"),
            ast::decl("--custom", "1"),
        ]);
        let overflow = PROPERTY_INDEX["overflow"];
        let white_space = PROPERTY_INDEX["white-space"];
        assert_eq!(sort.order, vec![overflow, white_space]);
        assert_eq!(sort.count, 3);
    }

    #[test]
    fn test_variant_mask_compares_like_bitmask() {
        let mask = |groups: &[usize]| {
            let mut mask = VariantMask::default();
            for group in groups {
                mask.insert(*group);
            }
            mask
        };
        assert!(mask(&[]) < mask(&[0]));
        assert!(mask(&[0]) < mask(&[1]));
        assert!(mask(&[0, 1]) > mask(&[1]));
        assert!(mask(&[2]) > mask(&[0, 1]));
        assert_eq!(mask(&[3, 1]), mask(&[1, 3]));
    }

    #[test]
    fn test_compile_candidates_sorts() {
        let ds = ds();
        let classes = ["md:flex", "p-4", "flex", "hover:flex", "relative"];
        let compiled = compile_candidates(&classes, &ds, |class| {
            panic!("unexpected invalid class {}", class)
        });
        let order: Vec<&str> = compiled
            .sorting
            .iter()
            .map(|sorting| sorting.candidate.as_str())
            .collect();
        assert_eq!(order, vec!["relative", "flex", "p-4", "hover:flex", "md:flex"]);
    }

    #[test]
    fn test_compile_candidates_reports_invalid_once() {
        let ds = ds();
        let mut invalid = Vec::new();
        let compiled = compile_candidates(&["nope", "flex", "nope", "bg-nope-1"], &ds, |class| {
            invalid.push(class.to_string())
        });
        assert_eq!(invalid, vec!["nope", "bg-nope-1"]);
        assert_eq!(compiled.ast_nodes.len(), 1);
    }

    #[test]
    fn test_compile_candidates_skips_invalid_set() {
        let ds = ds();
        ds.invalidate_candidate("flex");
        let mut invalid = Vec::new();
        let compiled = compile_candidates(&["flex"], &ds, |class| invalid.push(class.to_string()));
        assert!(compiled.ast_nodes.is_empty());
        assert_eq!(invalid, vec!["flex"]);
    }

    #[test]
    fn test_get_class_order() {
        let ds = ds();
        let order = get_class_order(&["p-4", "unknown", "flex"], &ds);
        assert_eq!(
            order,
            vec![
                ("p-4".to_string(), Some(1)),
                ("unknown".to_string(), None),
                ("flex".to_string(), Some(0)),
            ]
        );
    }
}
