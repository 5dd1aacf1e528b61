use std::rc::Rc;

use classcss::{DesignSystem, Theme};
use proptest::prelude::*;

fn theme() -> Theme {
    Theme::new()
        .add("--color-red-500", "#ef4444")
        .add("--spacing", "0.25rem")
        .add("--radius", "0.25rem")
        .add("--breakpoint-md", "48rem")
}

const POOL: &[&str] = &[
    "flex",
    "hidden",
    "p-4",
    "px-2",
    "bg-red-500",
    "bg-red-500/50",
    "md:flex",
    "hover:bg-red-500",
    "group-hover:underline",
    "rounded",
    "[mask-type:luminance]",
    "[color:theme(--missing)]",
    "garbage-!!",
    "bg-nope",
    "wobble:flex",
    "",
];

fn class_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(POOL), 0..12)
        .prop_map(|classes| classes.into_iter().map(str::to_string).collect())
}

proptest! {
    #[test]
    fn batch_output_matches_input_shape(classes in class_list()) {
        let ds = DesignSystem::new(theme());
        let css = ds.candidates_to_css(&classes);
        prop_assert_eq!(css.len(), classes.len());
    }

    #[test]
    fn batch_entries_are_independent(classes in class_list()) {
        let shared = DesignSystem::new(theme());
        let batch = shared.candidates_to_css(&classes);

        for (class, css) in classes.iter().zip(batch) {
            let alone = DesignSystem::new(theme()).candidates_to_css(&[class.as_str()]);
            prop_assert_eq!(&alone[0], &css, "class {:?}", class);
        }
    }

    #[test]
    fn parse_cache_is_idempotent_for_any_input(input in "\\PC{0,24}") {
        let ds = DesignSystem::new(theme());
        let first = ds.parse_candidate_cached(&input);
        let second = ds.parse_candidate_cached(&input);
        prop_assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn compile_never_panics_on_bracketed_input(inner in "[a-z0-9_#%(),.:/-]{0,16}") {
        let ds = DesignSystem::new(theme());
        let class = format!("bg-[{}]", inner);
        let _ = ds.candidates_to_css(&[class.as_str()]);
        let _ = ds.build_css(&[class.as_str()]);
    }

    #[test]
    fn missing_theme_path_ignores_modifier(name in "[a-z]{1,8}", alpha in "[0-9]{1,3}%?") {
        let ds = DesignSystem::new(theme());
        let path = format!("--missing-{} / {}", name, alpha);
        prop_assert_eq!(ds.resolve_theme_value(&path), None);
    }

    #[test]
    fn tracking_never_marks_unknown_variables(raw in "\\PC{0,32}") {
        let ds = DesignSystem::new(theme());
        ds.track_used_variables(&raw);
        for name in ds.theme().used_variables() {
            prop_assert!(ds.theme().contains(&name));
        }
    }
}
