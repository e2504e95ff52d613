//! Author attribution for squash commits

use std::collections::BTreeMap;

/// Pick the author credited with a squash commit.
///
/// The author with the most commits wins. Identities are compared in sorted
/// order, so a tie goes to the lexicographically first identity. Returns
/// `None` for an empty list.
pub fn attribute_author<S: AsRef<str>>(authors: &[S]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for author in authors {
        *counts.entry(author.as_ref()).or_default() += 1;
    }

    // max_by_key keeps the last maximum; iterate in reverse so the first
    // identity in sorted order wins ties.
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(author, _)| author.to_string())
}
