use std::cmp::Ordering;
use std::collections::HashMap;

use crate::candidate::{Variant, VariantRef};
use crate::intern::{InternId, Interned};

/// Group index of every variant known to the design system.
///
/// Variants that compare equal share a group; groups are numbered from `0`
/// without gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantOrder {
    groups: HashMap<InternId, usize>,
}

impl VariantOrder {
    /// Sorts `variants` with `compare` and assigns group indices in one pass.
    pub fn new<F>(mut variants: Vec<VariantRef>, compare: F) -> Self
    where
        F: Fn(&Variant, &Variant) -> Ordering,
    {
        variants.sort_by(|a, b| compare(a, b));

        let mut groups = HashMap::with_capacity(variants.len());
        let mut index = 0;
        let mut previous: Option<&VariantRef> = None;
        for variant in &variants {
            if let Some(previous) = previous {
                if compare(previous, variant) != Ordering::Equal {
                    index += 1;
                }
            }
            groups.insert(variant.id(), index);
            previous = Some(variant);
        }

        Self { groups }
    }

    /// Returns the group of a variant, or `None` if it was not known when
    /// the order was computed.
    pub fn get(&self, variant: &Interned<Variant>) -> Option<usize> {
        self.groups.get(&variant.id()).copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
