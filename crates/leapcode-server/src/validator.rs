//! Submitted-code validation.
//!
//! Comparison is deliberately strict: same length, same elements, same
//! order. The game's pedagogy depends on exact step-by-step sequences, so
//! there is no partial credit, no reordering tolerance, no fuzzy matching.

/// Normalizes one action call for comparison.
fn normalize(action: &str) -> String {
    action.trim().to_lowercase()
}

/// Returns `true` iff the submitted actions match the expected sequence
/// exactly after normalization (surrounding whitespace trimmed, lowercased).
///
/// An empty submission never matches. Callers must resolve `expected` from
/// the catalog first; the validator does not special-case unknown
/// level/objective pairs.
#[must_use]
pub fn is_correct(submitted: &[String], expected: &[&str]) -> bool {
    if submitted.is_empty() || submitted.len() != expected.len() {
        return false;
    }

    submitted
        .iter()
        .zip(expected.iter())
        .all(|(s, e)| normalize(s) == normalize(e))
}
