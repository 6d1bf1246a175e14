//! Locale-aware key ordering.
//!
//! Keys are collated with the CLDR root collation (Unicode Collation
//! Algorithm), the same order browsers use for an untailored `localeCompare`.

use std::cmp::Ordering;

use feruca::Collator;

/// Compares two metadata keys for display order.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    Collator::default().collate(a, b)
}

/// Sorts keys in place by [`locale_cmp`].
pub fn sort_keys(keys: &mut [String]) {
    let mut collator = Collator::default();
    keys.sort_by(|a, b| collator.collate(a, b));
}
