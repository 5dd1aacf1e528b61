//! The design system: registries, caches and the compilation facade.
//!
//! A [`DesignSystem`] owns the theme, the utility and variant registries and
//! every cache used during compilation. It is handed to all parsing and
//! compilation functions, which re-enter its caches as needed (a variant
//! parser parsing the inner variant of `group-hover`, a substitution resolving
//! `theme()`).
//!
//! # Caches
//!
//! | Cache                | Key                 | Value                          |
//! |----------------------|---------------------|--------------------------------|
//! | candidates           | class name          | shared list of [`CandidateRef`]|
//! | variants             | variant string      | `Option<`[`VariantRef`]`>`     |
//! | compiled             | candidate identity  | shared list of compiled nodes  |
//! | tracked values       | raw value string    | (set membership)               |
//!
//! All caches are append-only for the lifetime of the design system. Parsed
//! values get an [`InternId`] when first cached, and the compiled cache is
//! keyed by that id, so a class name is parsed once and each resulting
//! candidate is compiled once.
//!
//! # Failure containment
//!
//! Nothing in the compilation path returns an error to the caller. A class
//! that does not parse yields no candidates; a candidate whose function
//! substitution fails is cached as producing no nodes. Callers observe
//! failure only as missing output.
//!
//! # Threading
//!
//! The caches use interior mutability without locking, so a design system is
//! neither `Send` nor `Sync`. Use one per thread.
//!
//! # Example
//!
//! ```rust
//! use classcss::{DesignSystem, Theme};
//!
//! let ds = DesignSystem::new(
//!     Theme::new()
//!         .add("--color-red-500", "#ef4444")
//!         .add("--spacing", "0.25rem"),
//! );
//!
//! let css = ds.candidates_to_css(&["p-4", "garbage-!!", "bg-red-500/50"]);
//! assert_eq!(
//!     css[0].as_deref(),
//!     Some(".p-4 {\n  padding: calc(var(--spacing) * 4);\n}\n")
//! );
//! assert_eq!(css[1], None);
//! assert!(css[2].as_deref().unwrap().contains("color-mix(in oklab"));
//! ```

mod backend;
mod builder;
mod order;
mod variables;

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::ast::{self, optimize_ast, AstNode};
use crate::candidate::{Candidate, CandidateRef, VariantRef};
use crate::compile::{self, CompiledNode};
use crate::error::CompileError;
use crate::intern::{InternId, Interned};
use crate::theme::{with_alpha, Theme};
use crate::utilities::Utilities;
use crate::variants::Variants;

pub use backend::{Backend, StandardBackend};
pub use builder::DesignSystemBuilder;
pub use order::VariantOrder;
pub use variables::referenced_variables;

/// Registries, caches and the compilation entry points.
pub struct DesignSystem {
    theme: Theme,
    utilities: Utilities,
    variants: Variants,
    important: bool,
    backend: Box<dyn Backend>,

    invalid_candidates: RefCell<HashSet<String>>,
    candidates: RefCell<HashMap<String, Rc<[CandidateRef]>>>,
    variant_cache: RefCell<IndexMap<String, Option<VariantRef>>>,
    compiled: RefCell<HashMap<InternId, Rc<[CompiledNode]>>>,
    tracked_values: RefCell<HashSet<String>>,
    next_id: Cell<u32>,
}

impl fmt::Debug for DesignSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesignSystem")
            .field("theme", &self.theme)
            .field("important", &self.important)
            .field("candidates", &self.candidates.borrow().len())
            .field("variants", &self.variant_cache.borrow().len())
            .field("compiled", &self.compiled.borrow().len())
            .field("invalid", &self.invalid_candidates.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Default for DesignSystem {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DesignSystem {
    /// Creates a design system with the built-in registries.
    pub fn new(theme: Theme) -> Self {
        Self::builder().theme(theme).build()
    }

    pub fn builder() -> DesignSystemBuilder {
        DesignSystemBuilder::new()
    }

    pub(crate) fn from_parts(
        theme: Theme,
        utilities: Utilities,
        variants: Variants,
        important: bool,
        backend: Box<dyn Backend>,
    ) -> Self {
        Self {
            theme,
            utilities,
            variants,
            important,
            backend,
            invalid_candidates: RefCell::default(),
            candidates: RefCell::default(),
            variant_cache: RefCell::default(),
            compiled: RefCell::default(),
            tracked_values: RefCell::default(),
            next_id: Cell::new(0),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn utilities(&self) -> &Utilities {
        &self.utilities
    }

    pub fn variants(&self) -> &Variants {
        &self.variants
    }

    /// Whether every declaration is emitted `!important`.
    pub fn is_important(&self) -> bool {
        self.important
    }

    fn intern<T>(&self, value: T) -> Interned<T> {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        Interned::new(InternId(id), value)
    }

    // Cache borrows are never held while calling into the backend, which
    // may re-enter these methods.

    /// Parses a class name, once.
    ///
    /// Repeated calls return the same shared list.
    pub fn parse_candidate_cached(&self, input: &str) -> Rc<[CandidateRef]> {
        if let Some(hit) = self.candidates.borrow().get(input) {
            return Rc::clone(hit);
        }

        trace!(candidate = input, "parsing candidate");
        let parsed: Rc<[CandidateRef]> = self
            .backend
            .parse_candidate(input, self)
            .into_iter()
            .map(|candidate| Rc::new(self.intern(candidate)))
            .collect();

        let mut cache = self.candidates.borrow_mut();
        Rc::clone(cache.entry(input.to_string()).or_insert(parsed))
    }

    /// Parses a variant prefix, once.
    pub fn parse_variant_cached(&self, input: &str) -> Option<VariantRef> {
        if let Some(hit) = self.variant_cache.borrow().get(input) {
            return hit.clone();
        }

        trace!(variant = input, "parsing variant");
        let parsed = self
            .backend
            .parse_variant(input, self)
            .map(|variant| Rc::new(self.intern(variant)));

        let mut cache = self.variant_cache.borrow_mut();
        cache.entry(input.to_string()).or_insert(parsed).clone()
    }

    /// Compiles a parsed candidate, once per candidate identity.
    ///
    /// If function substitution fails for any node, the candidate is cached
    /// as producing nothing.
    pub fn compile_cached(&self, candidate: &Interned<Candidate>) -> Rc<[CompiledNode]> {
        let id = candidate.id();
        if let Some(hit) = self.compiled.borrow().get(&id) {
            return Rc::clone(hit);
        }

        trace!(candidate = %candidate.raw, "compiling candidate");
        let compiled = self.backend.compile_ast_nodes(candidate.value(), self);
        let substituted: Result<Vec<CompiledNode>, CompileError> = compiled
            .into_iter()
            .map(|compiled| {
                let node = self.backend.substitute_functions(&compiled.node, self)?;
                Ok(CompiledNode { node, ..compiled })
            })
            .collect();

        let nodes: Rc<[CompiledNode]> = match substituted {
            Ok(nodes) => nodes.into(),
            Err(err) => {
                debug!(candidate = %candidate.raw, error = %err, "dropping candidate");
                Rc::from(Vec::new())
            }
        };

        let mut cache = self.compiled.borrow_mut();
        Rc::clone(cache.entry(id).or_insert(nodes))
    }

    /// Marks the theme variables referenced by a raw value as used.
    ///
    /// Each distinct value is scanned once. Variables that become used are
    /// followed into their own theme values, so a token defined in terms of
    /// another keeps both alive.
    pub fn track_used_variables(&self, raw: &str) {
        if !self.tracked_values.borrow_mut().insert(raw.to_string()) {
            return;
        }

        for name in referenced_variables(raw) {
            if !self.theme.mark_used_variable(&name) {
                continue;
            }
            if let Some(value) = self.theme.get(&name) {
                self.track_used_variables(value);
            }
        }
    }

    /// Groups every variant parsed so far.
    ///
    /// Only variants already in the variant cache are included. Use
    /// [`DesignSystem::variant_order_for`] to order a known set of classes.
    pub fn variant_order(&self) -> VariantOrder {
        let variants: Vec<VariantRef> = self
            .variant_cache
            .borrow()
            .values()
            .flatten()
            .cloned()
            .collect();
        VariantOrder::new(variants, |a, b| self.variants.compare(a, b))
    }

    /// Parses `classes` and then groups every known variant, so all variants
    /// used by `classes` have a group.
    pub fn variant_order_for<S: AsRef<str>>(&self, classes: &[S]) -> VariantOrder {
        for class in classes {
            self.parse_candidate_cached(class.as_ref());
        }
        self.variant_order()
    }

    /// Resolves a theme path with an optional opacity modifier.
    ///
    /// `--color-red-500 / 50%` and `colors.red.500/50%` both look up
    /// `--color-red-500` and apply 50% alpha. A missing value yields `None`
    /// whether or not a modifier was given.
    pub fn resolve_theme_value(&self, path: &str) -> Option<String> {
        let (path, modifier) = match path.rsplit_once('/') {
            Some((path, modifier)) => (path.trim(), Some(modifier.trim())),
            None => (path.trim(), None),
        };

        let segments: Vec<&str> = if path.starts_with("--") {
            vec![path]
        } else {
            path.split('.').collect()
        };

        let value = self.theme.get_path(&segments)?;
        Some(match modifier {
            Some(modifier) => with_alpha(value, modifier),
            None => value.to_string(),
        })
    }

    /// Compiles each class name on its own into optimized nodes.
    ///
    /// Entries are `None` for classes that are invalid or produce nothing.
    pub fn candidates_to_ast<S: AsRef<str>>(&self, classes: &[S]) -> Vec<Option<Vec<AstNode>>> {
        classes
            .iter()
            .map(|class| {
                let mut was_invalid = false;
                let compiled = compile::compile_candidates(&[class.as_ref()], self, |_| {
                    was_invalid = true;
                });
                let nodes = optimize_ast(compiled.ast_nodes);
                if was_invalid || nodes.is_empty() {
                    None
                } else {
                    Some(nodes)
                }
            })
            .collect()
    }

    /// Compiles each class name on its own into CSS text.
    ///
    /// The output has one entry per input, in order; invalid classes yield
    /// `None` without affecting their neighbours.
    pub fn candidates_to_css<S: AsRef<str>>(&self, classes: &[S]) -> Vec<Option<String>> {
        self.candidates_to_ast(classes)
            .into_iter()
            .map(|nodes| nodes.map(|nodes| ast::to_css(&nodes)))
            .collect()
    }

    /// Returns each class name with its position in the stylesheet.
    pub fn get_class_order<S: AsRef<str>>(&self, classes: &[S]) -> Vec<(String, Option<u64>)> {
        compile::get_class_order(classes, self)
    }

    /// Builds a complete stylesheet.
    ///
    /// The used theme variables are emitted in `@layer theme` on `:root, :host`,
    /// followed by the sorted utilities in `@layer utilities`. Classes that
    /// produce nothing are added to the invalid-candidate set.
    pub fn build_css<S: AsRef<str>>(&self, classes: &[S]) -> String {
        let compiled = compile::compile_candidates(classes, self, |class| {
            self.invalidate_candidate(class);
        });
        let utilities = optimize_ast(compiled.ast_nodes);

        for node in &utilities {
            node.for_each_declaration(&mut |_, value| self.track_used_variables(value));
        }

        let mut stylesheet = Vec::new();
        let variables = self.theme.emitted_declarations();
        if !variables.is_empty() {
            stylesheet.push(ast::at_rule(
                "layer",
                "theme",
                vec![ast::rule(":root, :host", variables)],
            ));
        }
        if !utilities.is_empty() {
            stylesheet.push(ast::at_rule("layer", "utilities", utilities));
        }
        ast::to_css(&stylesheet)
    }

    /// Adds a class name to the invalid-candidate set.
    pub fn invalidate_candidate(&self, class: &str) {
        if self.invalid_candidates.borrow_mut().insert(class.to_string()) {
            debug!(class, "candidate marked invalid");
        }
    }

    /// Returns `true` if the class name is in the invalid-candidate set.
    pub fn is_invalid_candidate(&self, class: &str) -> bool {
        self.invalid_candidates.borrow().contains(class)
    }
}
