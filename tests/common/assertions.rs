//! Domain-specific assertion macros for crowdseq harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that say which
//! ordering or membership rule was broken.

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Assert that the keys yielded by `$iter` are in non-decreasing order.
///
/// ```rust
/// assert_sorted_by!(results.variants, |v| v.chrom_pos_ref_alt.clone());
/// ```
#[macro_export]
macro_rules! assert_sorted_by {
    ($items:expr, $key:expr) => {{
        let keys: Vec<_> = $items.iter().map($key).collect();
        for pair in keys.windows(2) {
            if pair[0] > pair[1] {
                panic!(
                    "assert_sorted_by! failed: {:?} sorts after {:?}\n  all keys: {:?}",
                    pair[0], pair[1], keys
                );
            }
        }
    }};
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// Assert the exact approved symbols of a gene list, in order.
#[macro_export]
macro_rules! assert_symbols {
    ($genes:expr, [$($symbol:expr),* $(,)?]) => {{
        let actual: Vec<String> = $genes
            .iter()
            .map(|g| g.approved_symbol.clone().unwrap_or_default())
            .collect();
        let expected: Vec<String> = vec![$($symbol.to_string()),*];
        pretty_assertions::assert_eq!(actual, expected, "gene symbols differ");
    }};
}

/// Assert the exact canonical loci of a variant list, in order.
#[macro_export]
macro_rules! assert_loci {
    ($variants:expr, [$($locus:expr),* $(,)?]) => {{
        let actual: Vec<String> = $variants
            .iter()
            .map(|v| v.chrom_pos_ref_alt.clone())
            .collect();
        let expected: Vec<String> = vec![$($locus.to_string()),*];
        pretty_assertions::assert_eq!(actual, expected, "variant loci differ");
    }};
}

/// Assert that a JSON value is the empty-collection representation `{}`.
#[macro_export]
macro_rules! assert_empty_section {
    ($value:expr) => {{
        let value: &serde_json::Value = &$value;
        match value.as_object() {
            Some(map) if map.is_empty() => {}
            _ => panic!("assert_empty_section! failed: expected {{}}, got {}", value),
        }
    }};
}

/// Case-insensitive (ASCII) substring test, matching the store's `LIKE`.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Whether any term is contained in any of `fields`.
pub fn any_term_in_any(fields: &[Option<&str>], terms: &[String]) -> bool {
    fields
        .iter()
        .flatten()
        .any(|field| terms.iter().any(|t| contains_ci(field, t)))
}
