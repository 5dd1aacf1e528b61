//! Theme struct for building design-token collections.

use std::cell::RefCell;

use indexmap::{IndexMap, IndexSet};

use crate::ast::{self, AstNode};

/// Flags controlling how a theme value is referenced and emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeOptions {
    /// Utilities inline the raw value instead of emitting `var(--name)`.
    pub inline: bool,
    /// The variable is never emitted; it exists only for lookups.
    pub reference: bool,
    /// The variable is always emitted, even when unused.
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ThemeValue {
    value: String,
    options: ThemeOptions,
}

/// An ordered collection of design tokens keyed by custom-property name.
///
/// # Example
///
/// ```rust
/// use classcss::Theme;
///
/// let theme = Theme::new()
///     .add("--color-red-500", "oklch(63.7% 0.237 25.331)")
///     .add("--spacing", "0.25rem")
///     .add("--breakpoint-md", "48rem");
///
/// assert_eq!(theme.get("--spacing"), Some("0.25rem"));
/// assert_eq!(theme.get_path(&["colors", "red", "500"]), Some("oklch(63.7% 0.237 25.331)"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Theme {
    values: IndexMap<String, ThemeValue>,
    used: RefCell<IndexSet<String>>,
}

impl Theme {
    /// Creates an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token, returning an updated theme for chaining.
    ///
    /// Re-adding a name replaces its value but keeps its original position.
    pub fn add(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_with_options(name, value, ThemeOptions::default())
    }

    /// Adds a token with explicit [`ThemeOptions`].
    pub fn add_with_options(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        options: ThemeOptions,
    ) -> Self {
        self.insert(name.into(), value.into(), options);
        self
    }

    pub(crate) fn insert(&mut self, name: String, value: String, options: ThemeOptions) {
        self.values.insert(name, ThemeValue { value, options });
    }

    /// Returns the raw value stored under a custom-property name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|entry| entry.value.as_str())
    }

    /// Returns the options of a token.
    pub fn options(&self, name: &str) -> Option<ThemeOptions> {
        self.values.get(name).map(|entry| entry.options)
    }

    /// Returns `true` if the theme has a token with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the theme has no tokens.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.value.as_str()))
    }

    /// Iterates over the tokens of a namespace, yielding `(suffix, value)`.
    ///
    /// `namespace("--breakpoint")` yields `("md", "48rem")` for
    /// `--breakpoint-md: 48rem`.
    pub fn namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.values.iter().filter_map(move |(name, entry)| {
            let suffix = name.strip_prefix(namespace)?.strip_prefix('-')?;
            Some((suffix, entry.value.as_str()))
        })
    }

    /// Maps a theme path to the custom-property name it refers to.
    ///
    /// A single segment starting with `--` is used as-is. Otherwise the first
    /// segment names a namespace (`colors`, `spacing`, `fontSize`, ...) and
    /// the remaining segments are joined with `-`; a trailing `DEFAULT`
    /// segment is dropped.
    pub fn key_for_path(segments: &[&str]) -> Option<String> {
        match segments {
            [] => None,
            [single] if single.starts_with("--") => Some((*single).to_string()),
            [namespace, rest @ ..] => {
                let namespace = namespace_for(namespace)?;
                let rest: Vec<&str> = rest
                    .iter()
                    .copied()
                    .filter(|segment| *segment != "DEFAULT")
                    .collect();
                if rest.is_empty() {
                    Some(format!("--{}", namespace))
                } else {
                    Some(format!("--{}-{}", namespace, rest.join("-")))
                }
            }
        }
    }

    /// Looks up a value by path segments (see [`Theme::key_for_path`]).
    pub fn get_path(&self, segments: &[&str]) -> Option<&str> {
        let key = Self::key_for_path(segments)?;
        self.get(&key)
    }

    /// Marks a variable as used.
    ///
    /// Returns `true` only when the variable exists in the theme and was not
    /// marked before.
    pub fn mark_used_variable(&self, name: &str) -> bool {
        if !self.values.contains_key(name) {
            return false;
        }
        self.used.borrow_mut().insert(name.to_string())
    }

    /// Returns `true` if the variable has been marked used.
    pub fn is_used(&self, name: &str) -> bool {
        self.used.borrow().contains(name)
    }

    /// Returns the used variables in the order they were first marked.
    pub fn used_variables(&self) -> Vec<String> {
        self.used.borrow().iter().cloned().collect()
    }

    /// Builds declarations for every variable that must be emitted.
    ///
    /// Used and static variables are included in theme order; reference
    /// variables never are.
    pub fn emitted_declarations(&self) -> Vec<AstNode> {
        let used = self.used.borrow();
        self.values
            .iter()
            .filter(|(name, entry)| {
                !entry.options.reference && (entry.options.is_static || used.contains(*name))
            })
            .map(|(name, entry)| ast::decl(name.as_str(), entry.value.as_str()))
            .collect()
    }
}

/// Legacy dotted namespaces and the custom-property namespace they map to.
fn namespace_for(segment: &str) -> Option<&str> {
    let namespace = match segment {
        "colors" | "color" => "color",
        "spacing" => "spacing",
        "fontSize" | "text" => "text",
        "fontWeight" | "font-weight" => "font-weight",
        "fontFamily" | "font" => "font",
        "borderRadius" | "radius" => "radius",
        "screens" | "breakpoint" => "breakpoint",
        "opacity" => "opacity",
        "boxShadow" | "shadow" => "shadow",
        "zIndex" => "z-index",
        _ => return None,
    };
    Some(namespace)
}
