//! Image decoding plus the JSON and CSV formats exchanged with the outside world.

pub mod csv;
pub mod image_io;
pub mod processing;
pub mod project;

use std::collections::BTreeMap;

/// Entries of a JSON object keyed by ids, integer-like keys first in numeric
/// order, then the remaining keys in lexical order.
pub(crate) fn ordered_entries<V>(map: &BTreeMap<String, V>) -> Vec<(&str, &V)> {
    let mut entries: Vec<(&str, &V)> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries.sort_by(|(a, _), (b, _)| key_order(a).cmp(&key_order(b)));
    entries
}

fn key_order(key: &str) -> (bool, u64, &str) {
    match key.parse::<u64>() {
        Ok(n) => (false, n, key),
        Err(_) => (true, 0, key),
    }
}
