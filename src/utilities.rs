//! Utility registry.
//!
//! Maps utility roots to the declarations they produce. There are two kinds:
//!
//! - **Static** utilities have a fixed set of declarations (`flex`, `hidden`).
//! - **Functional** utilities take a value and optionally a modifier
//!   (`bg-red-500/50`, `p-4`, `w-[42px]`). Each one is an ordered list of
//!   [`ValueRule`]s; the first rule that resolves the value wins.
//!
//! Values are resolved against the [`Theme`]. Theme-backed values are emitted
//! as `var(--name)` references unless the token was declared `inline`, in
//! which case its raw value is used.
//!
//! # Example
//!
//! ```rust
//! use classcss::utilities::{FunctionalUtility, Utilities, ValueSource};
//!
//! let mut utilities = Utilities::new();
//! utilities.add_static("sr-only", &[("position", "absolute"), ("width", "1px")]);
//! utilities.add_functional(
//!     "fill",
//!     FunctionalUtility::new().rule(ValueSource::color(&["--fill", "--color"]), &["fill"]),
//! );
//!
//! assert!(utilities.has_static("sr-only"));
//! assert!(utilities.has_functional("fill"));
//! ```

use indexmap::IndexMap;

use crate::ast::{self, AstNode};
use crate::candidate::{CandidateKind, CandidateValue};
use crate::theme::{alpha_from_modifier, with_alpha, Theme};

/// The shape of value a rule expects, used to route arbitrary values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Color,
    Length,
    Number,
    Percentage,
    Any,
}

/// Where a functional utility looks up named values.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
    /// Colors from theme namespaces, plus `transparent`, `current` and
    /// `inherit`. Accepts opacity modifiers.
    Color(Vec<String>),
    /// The spacing scale: `--spacing-{n}`, `px`, or multiples of `--spacing`.
    Spacing,
    /// Values from theme namespaces.
    Theme {
        namespaces: Vec<String>,
        value_type: ValueType,
    },
    /// Bare integers (`z-10`).
    Integer,
    /// Numbers rendered as percentages (`opacity-50`).
    Percentage,
    /// Numbers rendered as pixels (`border-2`).
    Pixels,
    /// Fixed keywords (`w-full`).
    Keywords(Vec<(String, String)>),
}

impl ValueSource {
    /// Creates a color source from theme namespaces, searched in order.
    pub fn color(namespaces: &[&str]) -> Self {
        ValueSource::Color(namespaces.iter().map(|ns| ns.to_string()).collect())
    }

    /// Creates a theme source from namespaces, searched in order.
    pub fn theme(namespaces: &[&str], value_type: ValueType) -> Self {
        ValueSource::Theme {
            namespaces: namespaces.iter().map(|ns| ns.to_string()).collect(),
            value_type,
        }
    }

    /// Creates a keyword source.
    pub fn keywords(pairs: &[(&str, &str)]) -> Self {
        ValueSource::Keywords(
            pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }

    fn value_type(&self) -> ValueType {
        match self {
            ValueSource::Color(_) => ValueType::Color,
            ValueSource::Spacing | ValueSource::Pixels => ValueType::Length,
            ValueSource::Theme { value_type, .. } => *value_type,
            ValueSource::Integer => ValueType::Number,
            ValueSource::Percentage => ValueType::Percentage,
            ValueSource::Keywords(_) => ValueType::Any,
        }
    }

    fn resolve(&self, name: &str, theme: &Theme) -> Option<String> {
        match self {
            ValueSource::Color(namespaces) => match name {
                "transparent" => Some("transparent".to_string()),
                "current" => Some("currentcolor".to_string()),
                "inherit" => Some("inherit".to_string()),
                _ => lookup(theme, namespaces, name),
            },
            ValueSource::Spacing => {
                if let Some(value) = theme_reference(theme, &format!("--spacing-{}", name)) {
                    return Some(value);
                }
                if name == "px" {
                    return Some("1px".to_string());
                }
                let multiplier = parse_number(name)?;
                if (multiplier * 4.0).fract() != 0.0 || !theme.contains("--spacing") {
                    return None;
                }
                Some(format!("calc(var(--spacing) * {})", name))
            }
            ValueSource::Theme { namespaces, .. } => lookup(theme, namespaces, name),
            ValueSource::Integer => {
                name.parse::<u32>().ok()?;
                Some(name.to_string())
            }
            ValueSource::Percentage => {
                parse_number(name)?;
                Some(format!("{}%", name))
            }
            ValueSource::Pixels => {
                parse_number(name)?;
                Some(format!("{}px", name))
            }
            ValueSource::Keywords(pairs) => pairs
                .iter()
                .find(|(keyword, _)| keyword == name)
                .map(|(_, value)| value.clone()),
        }
    }
}

/// A value source and the properties it sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRule {
    pub source: ValueSource,
    pub properties: Vec<String>,
}

/// The value used when a functional utility is written without one.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Literal(String),
    /// A theme token, e.g. `--radius` for `rounded`.
    Theme(String),
}

/// A utility that takes a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionalUtility {
    rules: Vec<ValueRule>,
    default: Option<(DefaultValue, Vec<String>)>,
}

impl FunctionalUtility {
    /// Creates a utility with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value rule. Rules are tried in the order they were added.
    pub fn rule(mut self, source: ValueSource, properties: &[&str]) -> Self {
        self.rules.push(ValueRule {
            source,
            properties: properties.iter().map(|p| p.to_string()).collect(),
        });
        self
    }

    /// Sets the declarations used when no value is given.
    pub fn with_default(mut self, value: DefaultValue, properties: &[&str]) -> Self {
        self.default = Some((value, properties.iter().map(|p| p.to_string()).collect()));
        self
    }

    fn compile(
        &self,
        value: Option<&CandidateValue>,
        modifier: Option<&CandidateValue>,
        theme: &Theme,
    ) -> Option<Vec<AstNode>> {
        let Some(value) = value else {
            if modifier.is_some() {
                return None;
            }
            let (default, properties) = self.default.as_ref()?;
            let resolved = match default {
                DefaultValue::Literal(literal) => literal.clone(),
                DefaultValue::Theme(name) => theme_reference(theme, name)?,
            };
            return Some(declarations(properties, &resolved));
        };

        let (rule, resolved) = match value {
            CandidateValue::Named(name) => self
                .rules
                .iter()
                .find_map(|rule| Some((rule, rule.source.resolve(name, theme)?)))?,
            CandidateValue::Arbitrary(raw) => (self.rule_for_arbitrary(raw)?, raw.clone()),
        };

        let resolved = match modifier {
            None => resolved,
            Some(modifier) if rule.source.value_type() == ValueType::Color => {
                with_alpha(&resolved, &resolve_alpha(modifier, theme)?)
            }
            Some(_) => return None,
        };

        Some(declarations(&rule.properties, &resolved))
    }

    fn rule_for_arbitrary(&self, raw: &str) -> Option<&ValueRule> {
        if self.rules.len() == 1 {
            return self.rules.first();
        }
        let inferred = infer_type(raw);
        if inferred == ValueType::Any {
            return self.rules.first();
        }
        self.rules
            .iter()
            .find(|rule| rule.source.value_type() == inferred)
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|rule| rule.source.value_type() == ValueType::Any)
            })
    }
}

/// Registry of static and functional utilities.
#[derive(Debug, Clone, Default)]
pub struct Utilities {
    statics: IndexMap<String, Vec<(String, String)>>,
    functionals: IndexMap<String, FunctionalUtility>,
}

impl Utilities {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a static utility.
    pub fn add_static(&mut self, name: &str, declarations: &[(&str, &str)]) {
        self.statics.insert(
            name.to_string(),
            declarations
                .iter()
                .map(|(property, value)| (property.to_string(), value.to_string()))
                .collect(),
        );
    }

    /// Registers a functional utility.
    pub fn add_functional(&mut self, name: &str, utility: FunctionalUtility) {
        self.functionals.insert(name.to_string(), utility);
    }

    /// Returns `true` if a static utility is registered under `name`.
    pub fn has_static(&self, name: &str) -> bool {
        self.statics.contains_key(name)
    }

    /// Returns `true` if a functional utility is registered under `name`.
    pub fn has_functional(&self, name: &str) -> bool {
        self.functionals.contains_key(name)
    }

    /// Iterates over all registered roots, static ones first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.statics
            .keys()
            .chain(self.functionals.keys())
            .map(String::as_str)
    }

    /// Produces the declarations for a candidate's base utility.
    ///
    /// Returns `None` when the utility is unknown or the value cannot be
    /// resolved.
    pub fn compile(&self, kind: &CandidateKind, theme: &Theme) -> Option<Vec<AstNode>> {
        match kind {
            CandidateKind::Static { root } => {
                let declarations = self.statics.get(root)?;
                Some(
                    declarations
                        .iter()
                        .map(|(property, value)| ast::decl(property.as_str(), value.as_str()))
                        .collect(),
                )
            }
            CandidateKind::Functional {
                root,
                value,
                modifier,
            } => self
                .functionals
                .get(root)?
                .compile(value.as_ref(), modifier.as_ref(), theme),
            CandidateKind::ArbitraryProperty {
                property,
                value,
                modifier,
            } => {
                let value = match modifier {
                    Some(modifier) => with_alpha(value, &resolve_alpha(modifier, theme)?),
                    None => value.clone(),
                };
                Some(vec![ast::decl(property.as_str(), value)])
            }
        }
    }

    /// The built-in utility set.
    pub fn standard() -> Self {
        let mut utilities = Self::new();

        for (name, display) in [
            ("block", "block"),
            ("inline-block", "inline-block"),
            ("inline", "inline"),
            ("flex", "flex"),
            ("inline-flex", "inline-flex"),
            ("grid", "grid"),
            ("contents", "contents"),
            ("hidden", "none"),
        ] {
            utilities.add_static(name, &[("display", display)]);
        }
        for position in ["static", "relative", "absolute", "fixed", "sticky"] {
            utilities.add_static(position, &[("position", position)]);
        }
        for transform in ["uppercase", "lowercase", "capitalize"] {
            utilities.add_static(transform, &[("text-transform", transform)]);
        }
        utilities.add_static("normal-case", &[("text-transform", "none")]);
        utilities.add_static("italic", &[("font-style", "italic")]);
        utilities.add_static("not-italic", &[("font-style", "normal")]);
        utilities.add_static("underline", &[("text-decoration-line", "underline")]);
        utilities.add_static("line-through", &[("text-decoration-line", "line-through")]);
        utilities.add_static("no-underline", &[("text-decoration-line", "none")]);
        utilities.add_static(
            "truncate",
            &[
                ("overflow", "hidden"),
                ("text-overflow", "ellipsis"),
                ("white-space", "nowrap"),
            ],
        );

        utilities.add_functional(
            "bg",
            FunctionalUtility::new().rule(
                ValueSource::color(&["--background-color", "--color"]),
                &["background-color"],
            ),
        );
        utilities.add_functional(
            "text",
            FunctionalUtility::new()
                .rule(
                    ValueSource::theme(&["--text"], ValueType::Length),
                    &["font-size"],
                )
                .rule(
                    ValueSource::color(&["--text-color", "--color"]),
                    &["color"],
                ),
        );
        utilities.add_functional(
            "border",
            FunctionalUtility::new()
                .with_default(DefaultValue::Literal("1px".to_string()), &["border-width"])
                .rule(ValueSource::Pixels, &["border-width"])
                .rule(
                    ValueSource::color(&["--border-color", "--color"]),
                    &["border-color"],
                ),
        );
        utilities.add_functional(
            "rounded",
            FunctionalUtility::new()
                .with_default(DefaultValue::Theme("--radius".to_string()), &["border-radius"])
                .rule(
                    ValueSource::theme(&["--radius"], ValueType::Length),
                    &["border-radius"],
                )
                .rule(
                    ValueSource::keywords(&[("none", "0"), ("full", "calc(infinity * 1px)")]),
                    &["border-radius"],
                ),
        );
        utilities.add_functional(
            "font",
            FunctionalUtility::new()
                .rule(
                    ValueSource::theme(&["--font-weight"], ValueType::Number),
                    &["font-weight"],
                )
                .rule(
                    ValueSource::theme(&["--font"], ValueType::Any),
                    &["font-family"],
                ),
        );
        utilities.add_functional(
            "leading",
            FunctionalUtility::new()
                .rule(
                    ValueSource::theme(&["--leading"], ValueType::Number),
                    &["line-height"],
                )
                .rule(ValueSource::Spacing, &["line-height"]),
        );
        utilities.add_functional(
            "shadow",
            FunctionalUtility::new()
                .with_default(DefaultValue::Theme("--shadow".to_string()), &["box-shadow"])
                .rule(
                    ValueSource::theme(&["--shadow"], ValueType::Any),
                    &["box-shadow"],
                )
                .rule(ValueSource::keywords(&[("none", "0 0 #0000")]), &["box-shadow"]),
        );
        utilities.add_functional(
            "z",
            FunctionalUtility::new()
                .rule(ValueSource::Integer, &["z-index"])
                .rule(ValueSource::keywords(&[("auto", "auto")]), &["z-index"]),
        );
        utilities.add_functional(
            "opacity",
            FunctionalUtility::new().rule(ValueSource::Percentage, &["opacity"]),
        );

        for (name, properties) in [
            ("p", &["padding"][..]),
            ("px", &["padding-inline"][..]),
            ("py", &["padding-block"][..]),
            ("pt", &["padding-top"][..]),
            ("pr", &["padding-right"][..]),
            ("pb", &["padding-bottom"][..]),
            ("pl", &["padding-left"][..]),
            ("gap", &["gap"][..]),
        ] {
            utilities.add_functional(
                name,
                FunctionalUtility::new().rule(ValueSource::Spacing, properties),
            );
        }
        for (name, properties) in [
            ("m", &["margin"][..]),
            ("mx", &["margin-inline"][..]),
            ("my", &["margin-block"][..]),
            ("mt", &["margin-top"][..]),
            ("mr", &["margin-right"][..]),
            ("mb", &["margin-bottom"][..]),
            ("ml", &["margin-left"][..]),
        ] {
            utilities.add_functional(
                name,
                FunctionalUtility::new()
                    .rule(ValueSource::Spacing, properties)
                    .rule(ValueSource::keywords(&[("auto", "auto")]), properties),
            );
        }
        for (name, property, screen) in [("w", "width", "100vw"), ("h", "height", "100vh")] {
            utilities.add_functional(
                name,
                FunctionalUtility::new()
                    .rule(ValueSource::Spacing, &[property])
                    .rule(
                        ValueSource::keywords(&[
                            ("auto", "auto"),
                            ("full", "100%"),
                            ("screen", screen),
                            ("min", "min-content"),
                            ("max", "max-content"),
                            ("fit", "fit-content"),
                        ]),
                        &[property],
                    ),
            );
        }
        utilities.add_functional(
            "size",
            FunctionalUtility::new()
                .rule(ValueSource::Spacing, &["width", "height"])
                .rule(
                    ValueSource::keywords(&[("auto", "auto"), ("full", "100%")]),
                    &["width", "height"],
                ),
        );

        utilities
    }
}

fn declarations(properties: &[String], value: &str) -> Vec<AstNode> {
    properties
        .iter()
        .map(|property| ast::decl(property.as_str(), value))
        .collect()
}

fn lookup(theme: &Theme, namespaces: &[String], name: &str) -> Option<String> {
    namespaces
        .iter()
        .find_map(|namespace| theme_reference(theme, &format!("{}-{}", namespace, name)))
}

/// `var(--name)`, or the raw value for inline tokens.
fn theme_reference(theme: &Theme, name: &str) -> Option<String> {
    let value = theme.get(name)?;
    let inline = theme.options(name).is_some_and(|options| options.inline);
    if inline {
        Some(value.to_string())
    } else {
        Some(format!("var({})", name))
    }
}

fn resolve_alpha(modifier: &CandidateValue, theme: &Theme) -> Option<String> {
    match modifier {
        CandidateValue::Arbitrary(value) => Some(value.clone()),
        CandidateValue::Named(name) => theme_reference(theme, &format!("--opacity-{}", name))
            .or_else(|| alpha_from_modifier(name)),
    }
}

fn parse_number(input: &str) -> Option<f64> {
    let number = input.parse::<f64>().ok()?;
    (number.is_finite() && number >= 0.0).then_some(number)
}

const COLOR_FUNCTIONS: &[&str] = &[
    "rgb(", "rgba(", "hsl(", "hsla(", "hwb(", "lab(", "lch(", "oklab(", "oklch(", "color(",
    "color-mix(", "light-dark(",
];

const COLOR_KEYWORDS: &[&str] = &[
    "transparent",
    "currentcolor",
    "black",
    "white",
    "red",
    "green",
    "blue",
    "yellow",
    "orange",
    "purple",
    "gray",
    "grey",
];

const LENGTH_FUNCTIONS: &[&str] = &["calc(", "min(", "max(", "clamp("];

fn infer_type(raw: &str) -> ValueType {
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with('#')
        || COLOR_FUNCTIONS.iter().any(|f| lower.starts_with(f))
        || COLOR_KEYWORDS.contains(&lower.as_str())
    {
        return ValueType::Color;
    }
    if LENGTH_FUNCTIONS.iter().any(|f| lower.starts_with(f)) {
        return ValueType::Length;
    }
    if lower.parse::<f64>().is_ok() {
        return ValueType::Number;
    }
    if let Some(number) = lower.strip_suffix('%') {
        if number.parse::<f64>().is_ok() {
            return ValueType::Percentage;
        }
    }
    let unit_start = lower
        .find(|ch: char| ch.is_ascii_alphabetic())
        .unwrap_or(lower.len());
    let (number, unit) = lower.split_at(unit_start);
    if !number.is_empty() && !unit.is_empty() && number.parse::<f64>().is_ok() {
        return ValueType::Length;
    }
    ValueType::Any
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeOptions;

    fn theme() -> Theme {
        Theme::new()
            .add("--color-red-500", "#ef4444")
            .add("--spacing", "0.25rem")
            .add("--text-sm", "0.875rem")
            .add("--radius", "0.25rem")
            .add("--opacity-half", "0.5")
            .add_with_options(
                "--font-weight-bold",
                "700",
                ThemeOptions {
                    inline: true,
                    ..Default::default()
                },
            )
    }

    fn functional(
        root: &str,
        value: Option<CandidateValue>,
        modifier: Option<CandidateValue>,
    ) -> CandidateKind {
        CandidateKind::Functional {
            root: root.to_string(),
            value,
            modifier,
        }
    }

    fn named(value: &str) -> Option<CandidateValue> {
        Some(CandidateValue::Named(value.to_string()))
    }

    fn arbitrary(value: &str) -> Option<CandidateValue> {
        Some(CandidateValue::Arbitrary(value.to_string()))
    }

    fn compile(kind: CandidateKind) -> Option<Vec<AstNode>> {
        Utilities::standard().compile(&kind, &theme())
    }

    #[test]
    fn test_static_utility() {
        let kind = CandidateKind::Static {
            root: "hidden".to_string(),
        };
        assert_eq!(compile(kind), Some(vec![ast::decl("display", "none")]));
    }

    #[test]
    fn test_color_from_theme() {
        assert_eq!(
            compile(functional("bg", named("red-500"), None)),
            Some(vec![ast::decl("background-color", "var(--color-red-500)")])
        );
    }

    #[test]
    fn test_color_with_modifier() {
        assert_eq!(
            compile(functional("bg", named("red-500"), named("50"))),
            Some(vec![ast::decl(
                "background-color",
                "color-mix(in oklab, var(--color-red-500) 50%, transparent)"
            )])
        );
        assert_eq!(
            compile(functional("bg", named("red-500"), named("half"))),
            Some(vec![ast::decl(
                "background-color",
                "color-mix(in oklab, var(--color-red-500) var(--opacity-half), transparent)"
            )])
        );
    }

    #[test]
    fn test_modifier_on_non_color_is_rejected() {
        assert_eq!(compile(functional("p", named("4"), named("50"))), None);
    }

    #[test]
    fn test_spacing_scale() {
        assert_eq!(
            compile(functional("p", named("4"), None)),
            Some(vec![ast::decl("padding", "calc(var(--spacing) * 4)")])
        );
        assert_eq!(
            compile(functional("px", named("px"), None)),
            Some(vec![ast::decl("padding-inline", "1px")])
        );
        assert_eq!(compile(functional("p", named("1.3"), None)), None);
    }

    #[test]
    fn test_text_routes_between_size_and_color() {
        assert_eq!(
            compile(functional("text", named("sm"), None)),
            Some(vec![ast::decl("font-size", "var(--text-sm)")])
        );
        assert_eq!(
            compile(functional("text", named("red-500"), None)),
            Some(vec![ast::decl("color", "var(--color-red-500)")])
        );
        assert_eq!(
            compile(functional("text", arbitrary("#0088cc"), None)),
            Some(vec![ast::decl("color", "#0088cc")])
        );
        assert_eq!(
            compile(functional("text", arbitrary("14px"), None)),
            Some(vec![ast::decl("font-size", "14px")])
        );
    }

    #[test]
    fn test_default_values() {
        assert_eq!(
            compile(functional("border", None, None)),
            Some(vec![ast::decl("border-width", "1px")])
        );
        assert_eq!(
            compile(functional("rounded", None, None)),
            Some(vec![ast::decl("border-radius", "var(--radius)")])
        );
        assert_eq!(compile(functional("shadow", None, None)), None);
    }

    #[test]
    fn test_inline_theme_value() {
        assert_eq!(
            compile(functional("font", named("bold"), None)),
            Some(vec![ast::decl("font-weight", "700")])
        );
    }

    #[test]
    fn test_arbitrary_property_with_modifier() {
        let kind = CandidateKind::ArbitraryProperty {
            property: "color".to_string(),
            value: "red".to_string(),
            modifier: arbitrary("0.5"),
        };
        assert_eq!(
            compile(kind),
            Some(vec![ast::decl(
                "color",
                "color-mix(in oklab, red 50%, transparent)"
            )])
        );
    }

    #[test]
    fn test_unknown_value() {
        assert_eq!(compile(functional("bg", named("nope-500"), None)), None);
        assert_eq!(compile(functional("nope", named("1"), None)), None);
    }

    #[test]
    fn test_infer_type() {
        assert_eq!(infer_type("#fff"), ValueType::Color);
        assert_eq!(infer_type("oklch(60% 0.2 30)"), ValueType::Color);
        assert_eq!(infer_type("12px"), ValueType::Length);
        assert_eq!(infer_type("calc(1rem + 2px)"), ValueType::Length);
        assert_eq!(infer_type("50%"), ValueType::Percentage);
        assert_eq!(infer_type("600"), ValueType::Number);
        assert_eq!(infer_type("var(--x)"), ValueType::Any);
    }
}
