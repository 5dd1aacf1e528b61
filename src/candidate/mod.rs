//! Parsed candidates and variants.
//!
//! A *candidate* is the structured form of one utility class such as
//! `md:hover:bg-red-500/50`. It is made of:
//!
//! - a base utility ([`CandidateKind`]): static (`flex`), functional
//!   (`bg` + value `red-500` + modifier `50`) or an arbitrary property
//!   (`[mask-type:luminance]`)
//! - zero or more [`Variant`]s (`hover`, `md`), stored innermost first
//! - an importance flag (`flex!`)
//!
//! One class string may parse into several candidates when more than one
//! registered utility root matches (`px-4` could be `px` + `4` or `p` + `x-4`);
//! the compiler decides which of them render.
//!
//! Parsed values are shared: the design system hands out [`CandidateRef`] and
//! [`VariantRef`] handles, and every lookup of the same string yields the same
//! handle.

mod parse;
mod segment;

use std::rc::Rc;

use crate::intern::Interned;

pub use parse::{parse_candidate, parse_variant};
pub use segment::{decode_arbitrary_value, segment};

/// Shared handle to an interned candidate.
pub type CandidateRef = Rc<Interned<Candidate>>;

/// Shared handle to an interned variant.
pub type VariantRef = Rc<Interned<Variant>>;

/// A named or arbitrary (`[...]`) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateValue {
    /// A value looked up by name, e.g. `red-500` in `bg-red-500`.
    Named(String),
    /// A literal value, e.g. `#ff0000` in `bg-[#ff0000]`.
    Arbitrary(String),
}

impl CandidateValue {
    /// Returns the underlying text.
    pub fn as_str(&self) -> &str {
        match self {
            CandidateValue::Named(value) | CandidateValue::Arbitrary(value) => value,
        }
    }
}

/// The base utility of a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKind {
    /// A utility that takes no value, e.g. `flex`.
    Static { root: String },
    /// A utility with an optional value and modifier, e.g. `bg-red-500/50`.
    Functional {
        root: String,
        value: Option<CandidateValue>,
        modifier: Option<CandidateValue>,
    },
    /// A raw `[property:value]` declaration.
    ArbitraryProperty {
        property: String,
        value: String,
        modifier: Option<CandidateValue>,
    },
}

/// Structured form of one utility class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The base utility.
    pub kind: CandidateKind,
    /// Variants, innermost (rightmost in the class name) first.
    pub variants: Vec<VariantRef>,
    /// Whether the class requested `!important`.
    pub important: bool,
    /// The full class name this candidate was parsed from.
    pub raw: String,
}

impl Candidate {
    /// Returns the utility root, if the candidate has one.
    pub fn root(&self) -> Option<&str> {
        match &self.kind {
            CandidateKind::Static { root } | CandidateKind::Functional { root, .. } => Some(root),
            CandidateKind::ArbitraryProperty { .. } => None,
        }
    }
}

/// Structured form of one variant prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    /// A variant that takes no value, e.g. `hover` or `md`.
    Static { root: String },
    /// A variant with a value, e.g. `data-[state=open]`.
    Functional { root: String, value: CandidateValue },
    /// A variant wrapping another variant, e.g. `group-hover`.
    Compound { root: String, variant: VariantRef },
    /// A literal selector or at-rule, e.g. `[&>*]` or `[@media_print]`.
    Arbitrary { selector: String },
}

impl Variant {
    /// Returns the registry root; empty for arbitrary variants.
    pub fn root(&self) -> &str {
        match self {
            Variant::Static { root }
            | Variant::Functional { root, .. }
            | Variant::Compound { root, .. } => root,
            Variant::Arbitrary { .. } => "",
        }
    }
}
