use std::cell::Cell;
use std::rc::Rc;

use classcss::ast::AstNode;
use classcss::candidate::{self, Candidate};
use classcss::compile::{self, CompiledNode};
use classcss::design_system::{referenced_variables, Backend};
use classcss::{functions, CompileError, DesignSystem, Theme};

#[derive(Default, Clone)]
struct Counters {
    parses: Rc<Cell<usize>>,
    compiles: Rc<Cell<usize>>,
    substitutions: Rc<Cell<usize>>,
}

struct CountingBackend(Counters);

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

impl Backend for CountingBackend {
    fn parse_candidate(&self, input: &str, ds: &DesignSystem) -> Vec<Candidate> {
        bump(&self.0.parses);
        candidate::parse_candidate(input, ds)
    }

    fn compile_ast_nodes(&self, candidate: &Candidate, ds: &DesignSystem) -> Vec<CompiledNode> {
        bump(&self.0.compiles);
        compile::compile_ast_nodes(candidate, ds)
    }

    fn substitute_functions(
        &self,
        node: &AstNode,
        ds: &DesignSystem,
    ) -> Result<AstNode, CompileError> {
        bump(&self.0.substitutions);
        functions::substitute_functions(node, ds)
    }
}

fn theme() -> Theme {
    Theme::new()
        .add("--color-red-500", "#ef4444")
        .add("--color-blue-500", "#3b82f6")
        .add("--spacing", "0.25rem")
        .add("--breakpoint-md", "48rem")
}

fn counting() -> (DesignSystem, Counters) {
    let counters = Counters::default();
    let ds = DesignSystem::builder()
        .theme(theme())
        .backend(CountingBackend(counters.clone()))
        .build();
    (ds, counters)
}

#[test]
fn test_parse_cache_is_idempotent() {
    let (ds, counters) = counting();

    let first = ds.parse_candidate_cached("hover:bg-red-500");
    let second = ds.parse_candidate_cached("hover:bg-red-500");

    assert!(Rc::ptr_eq(&first, &second));
    assert!(Rc::ptr_eq(&first[0], &second[0]));
    assert_eq!(counters.parses.get(), 1);
}

#[test]
fn test_compile_cache_runs_backend_once() {
    let (ds, counters) = counting();
    let candidates = ds.parse_candidate_cached("p-4");

    let first = ds.compile_cached(&candidates[0]);
    let second = ds.compile_cached(&candidates[0]);

    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(counters.compiles.get(), 1);
    assert_eq!(counters.substitutions.get(), 1);
}

#[test]
fn test_compile_cache_keeps_failures() {
    let (ds, counters) = counting();
    let candidates = ds.parse_candidate_cached("[color:theme(--x)]");

    assert!(ds.compile_cached(&candidates[0]).is_empty());
    assert!(ds.compile_cached(&candidates[0]).is_empty());
    assert_eq!(counters.compiles.get(), 1);
}

#[test]
fn test_failure_is_contained_within_batch() {
    let ds = DesignSystem::new(theme());
    let css = ds.candidates_to_css(&["[color:theme(--x)]", "flex"]);

    assert_eq!(css[0], None);
    assert_eq!(css[1].as_deref(), Some(".flex {\n  display: flex;\n}\n"));
}

#[test]
fn test_resolve_theme_value_with_modifier() {
    let ds = DesignSystem::new(theme());

    assert_eq!(
        ds.resolve_theme_value("--color-red-500 / 50%").as_deref(),
        Some("color-mix(in oklab, #ef4444 50%, transparent)")
    );

    let empty = DesignSystem::new(Theme::new());
    assert_eq!(empty.resolve_theme_value("--color-red-500 / 50%"), None);
}

#[test]
fn test_variant_grouping() {
    let ds = DesignSystem::new(theme());
    let order = ds.variant_order_for(&["data-[open]:flex", "data-[closed]:flex", "md:flex"]);

    let open = ds.parse_variant_cached("data-[open]").unwrap();
    let closed = ds.parse_variant_cached("data-[closed]").unwrap();
    let md = ds.parse_variant_cached("md").unwrap();

    assert_eq!(
        ds.variants().compare(&open, &closed),
        std::cmp::Ordering::Equal
    );
    assert_eq!(order.get(&open), order.get(&closed));
    assert!(order.get(&md) > order.get(&open));
    assert_eq!(order.get(&md), Some(1));
}

#[test]
fn test_batch_independence() {
    let ds = DesignSystem::new(theme());
    let css = ds.candidates_to_css(&["bg-red-500", "garbage-!!", "bg-blue-500"]);

    assert_eq!(
        css,
        vec![
            Some(".bg-red-500 {\n  background-color: var(--color-red-500);\n}\n".to_string()),
            None,
            Some(".bg-blue-500 {\n  background-color: var(--color-blue-500);\n}\n".to_string()),
        ]
    );
}

#[test]
fn test_used_variables_marked_once() {
    let ds = DesignSystem::new(Theme::new().add("--a", "1").add("--b", "2"));

    assert_eq!(
        referenced_variables("var(--a, var(--b, red))"),
        vec!["--a".to_string(), "--b".to_string()]
    );

    ds.track_used_variables("var(--a, var(--b, red))");
    assert_eq!(
        ds.theme().used_variables(),
        vec!["--a".to_string(), "--b".to_string()]
    );
}

#[test]
fn test_invalid_candidate_set_short_circuits() {
    let (ds, counters) = counting();

    ds.build_css(&["nope", "flex"]);
    assert!(ds.is_invalid_candidate("nope"));
    let parses = counters.parses.get();

    let css = ds.candidates_to_css(&["nope"]);
    assert_eq!(css, vec![None]);
    assert_eq!(counters.parses.get(), parses);
}

#[test]
fn test_variant_stacking() {
    let ds = DesignSystem::new(theme());
    let css = ds.candidates_to_css(&["md:group-hover:bg-red-500/50"]);

    assert_eq!(
        css[0].as_deref(),
        Some(concat!(
            "@media (width >= 48rem) {\n",
            "  .md\\:group-hover\\:bg-red-500\\/50:is(:where(.group):hover *) {\n",
            "    background-color: color-mix(in oklab, var(--color-red-500) 50%, transparent);\n",
            "  }\n",
            "}\n",
        ))
    );
}

#[test]
fn test_arbitrary_values_use_theme_functions() {
    let ds = DesignSystem::new(theme());
    let css = ds.candidates_to_css(&["bg-[theme(--color-red-500/25%)]", "p-[--spacing(2)]"]);

    assert_eq!(
        css[0].as_deref(),
        Some(concat!(
            ".bg-\\[theme\\(--color-red-500\\/25\\%\\)\\] {\n",
            "  background-color: color-mix(in oklab, #ef4444 25%, transparent);\n",
            "}\n",
        ))
    );
    assert_eq!(
        css[1].as_deref(),
        Some(".p-\\[--spacing\\(2\\)\\] {\n  padding: calc(var(--spacing) * 2);\n}\n")
    );
}

#[test]
fn test_build_css_orders_utilities() {
    let ds = DesignSystem::new(theme());
    let css = ds.build_css(&["md:flex", "hover:bg-blue-500", "p-2", "flex"]);

    let positions: Vec<usize> = [".flex", ".p-2", ".hover\\:bg-blue-500", ".md\\:flex"]
        .iter()
        .map(|selector| css.find(selector).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);

    assert!(css.contains("--color-blue-500: #3b82f6;"));
    assert!(!css.contains("--color-red-500"));
}

#[test]
fn test_class_order() {
    let ds = DesignSystem::new(theme());
    let order = ds.get_class_order(&["md:flex", "flex", "bogus"]);
    assert_eq!(
        order,
        vec![
            ("md:flex".to_string(), Some(1)),
            ("flex".to_string(), Some(0)),
            ("bogus".to_string(), None),
        ]
    );
}
