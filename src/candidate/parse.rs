//! Candidate and variant grammar.
//!
//! # Candidates
//!
//! ```text
//! candidate := (variant ":")* base
//! base      := "!"? utility "!"?
//! utility   := "[" property ":" value "]" ("/" modifier)?
//!            | static-root
//!            | functional-root ("-" value)? ("/" modifier)?
//! value     := named | "[" arbitrary "]" | "(" custom-property ")"
//! modifier  := named | "[" arbitrary "]"
//! ```
//!
//! Roots are resolved against the utility registry, so the parser needs the
//! design system. Every registered root that is a prefix of the base yields
//! its own candidate, longest root first.
//!
//! # Variants
//!
//! ```text
//! variant := "[" selector-or-at-rule "]"
//!          | static-root
//!          | compound-root "-" variant
//!          | functional-root "-" (named | "[" arbitrary "]")
//! ```
//!
//! Unparseable input yields an empty list or `None`; it is never an error.

use crate::design_system::DesignSystem;
use crate::variants::VariantKind;

use super::segment::{decode_arbitrary_value, is_balanced, segment};
use super::{Candidate, CandidateKind, CandidateValue, Variant};

/// Parses a class name into every candidate it can stand for.
pub fn parse_candidate(input: &str, ds: &DesignSystem) -> Vec<Candidate> {
    let segments = segment(input, ':');
    if segments.iter().any(|part| part.is_empty()) {
        return Vec::new();
    }
    let Some((base, variant_inputs)) = segments.split_last() else {
        return Vec::new();
    };

    let mut variants = Vec::with_capacity(variant_inputs.len());
    for variant_input in variant_inputs.iter().rev() {
        match ds.parse_variant_cached(variant_input) {
            Some(variant) => variants.push(variant),
            None => return Vec::new(),
        }
    }

    let (base, important) = strip_important(base);
    if base.is_empty() || !is_balanced(base) {
        return Vec::new();
    }

    let make = |kind: CandidateKind| Candidate {
        kind,
        variants: variants.clone(),
        important,
        raw: input.to_string(),
    };

    if base.starts_with('[') {
        return parse_arbitrary_property(base)
            .map(|kind| vec![make(kind)])
            .unwrap_or_default();
    }

    let mut candidates = Vec::new();
    let utilities = ds.utilities();

    if utilities.has_static(base) {
        candidates.push(make(CandidateKind::Static {
            root: base.to_string(),
        }));
    }

    let Some((base, modifier)) = split_modifier(base) else {
        return candidates;
    };

    // Root without a value, e.g. `rounded` or `border/50`.
    if utilities.has_functional(base) {
        candidates.push(make(CandidateKind::Functional {
            root: base.to_string(),
            value: None,
            modifier: modifier.clone(),
        }));
    }

    // Arbitrary value, e.g. `bg-[#ff0000]`.
    if base.ends_with(']') {
        if let Some(idx) = base.find("-[") {
            let root = &base[..idx];
            if utilities.has_functional(root) {
                if let Some(value) = decode_arbitrary_value(&base[idx + 2..base.len() - 1]) {
                    candidates.push(make(CandidateKind::Functional {
                        root: root.to_string(),
                        value: Some(CandidateValue::Arbitrary(value)),
                        modifier,
                    }));
                }
            }
        }
        return candidates;
    }

    // Custom property shorthand, e.g. `p-(--gutter)`.
    if base.ends_with(')') {
        if let Some(idx) = base.find("-(") {
            let root = &base[..idx];
            let inner = &base[idx + 2..base.len() - 1];
            if utilities.has_functional(root) && is_custom_property(inner) {
                candidates.push(make(CandidateKind::Functional {
                    root: root.to_string(),
                    value: Some(CandidateValue::Arbitrary(format!("var({})", inner))),
                    modifier,
                }));
            }
        }
        return candidates;
    }

    for (idx, _) in base.rmatch_indices('-') {
        let (root, value) = (&base[..idx], &base[idx + 1..]);
        if root.is_empty() || !is_named_value(value) || !utilities.has_functional(root) {
            continue;
        }
        candidates.push(make(CandidateKind::Functional {
            root: root.to_string(),
            value: Some(CandidateValue::Named(value.to_string())),
            modifier: modifier.clone(),
        }));
    }

    candidates
}

/// Parses a variant prefix.
pub fn parse_variant(input: &str, ds: &DesignSystem) -> Option<Variant> {
    if input.starts_with('[') {
        let inner = input.strip_prefix('[')?.strip_suffix(']')?;
        let selector = decode_arbitrary_value(inner)?;
        let selector = if selector.starts_with('@') || selector.contains('&') {
            selector
        } else {
            format!("&:is({})", selector)
        };
        return Some(Variant::Arbitrary { selector });
    }

    let registry = ds.variants();

    if registry.kind(input) == Some(VariantKind::Static) {
        return Some(Variant::Static {
            root: input.to_string(),
        });
    }

    for (idx, _) in input.match_indices('-') {
        let (root, rest) = (&input[..idx], &input[idx + 1..]);
        if rest.is_empty() {
            continue;
        }

        match registry.kind(root) {
            Some(VariantKind::Compound) => {
                let inner = ds.parse_variant_cached(rest)?;
                if !registry.compounds_with(root, &inner) {
                    return None;
                }
                return Some(Variant::Compound {
                    root: root.to_string(),
                    variant: inner,
                });
            }
            Some(VariantKind::Functional) => {
                let value = if rest.starts_with('[') {
                    let inner = rest.strip_prefix('[')?.strip_suffix(']')?;
                    CandidateValue::Arbitrary(decode_arbitrary_value(inner)?)
                } else {
                    CandidateValue::Named(rest.to_string())
                };
                return Some(Variant::Functional {
                    root: root.to_string(),
                    value,
                });
            }
            _ => {}
        }
    }

    None
}

fn strip_important(base: &str) -> (&str, bool) {
    if let Some(stripped) = base.strip_suffix('!') {
        (stripped, true)
    } else if let Some(stripped) = base.strip_prefix('!') {
        (stripped, true)
    } else {
        (base, false)
    }
}

/// Splits off a trailing `/modifier`. Returns `None` for malformed input
/// such as `bg-red-500/` or `a/b/c`.
fn split_modifier(base: &str) -> Option<(&str, Option<CandidateValue>)> {
    let parts = segment(base, '/');
    match parts.as_slice() {
        [only] => Some((only, None)),
        [base, modifier] if !base.is_empty() && !modifier.is_empty() => {
            let modifier = if modifier.starts_with('[') {
                let inner = modifier.strip_prefix('[')?.strip_suffix(']')?;
                CandidateValue::Arbitrary(decode_arbitrary_value(inner)?)
            } else {
                CandidateValue::Named((*modifier).to_string())
            };
            Some((base, Some(modifier)))
        }
        _ => None,
    }
}

fn parse_arbitrary_property(base: &str) -> Option<CandidateKind> {
    let (body, modifier) = split_modifier(base)?;
    let inner = body.strip_prefix('[')?.strip_suffix(']')?;
    let (property, value) = inner.split_once(':')?;

    let valid_property = !property.is_empty()
        && property
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        && !property.starts_with(|ch: char| ch.is_ascii_digit());
    if !valid_property {
        return None;
    }

    Some(CandidateKind::ArbitraryProperty {
        property: property.to_string(),
        value: decode_arbitrary_value(value)?,
        modifier,
    })
}

fn is_named_value(input: &str) -> bool {
    !input.is_empty()
        && input
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
}

fn is_custom_property(input: &str) -> bool {
    input.len() > 2
        && input.starts_with("--")
        && input[2..]
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
