//! Index maintenance utilities.
//!
//! Buckets (per-asset / per-account secondary indices) are order-preserving
//! filtered views of the primary `ids` sequence. They are never re-sorted
//! on their own; insertion position is always derived from `ids`.

/// Insert `key` into `bucket` without duplication, at the position that
/// keeps the bucket's relative order matching `ids`.
///
/// A key missing from `ids` is appended — callers always place the key in
/// `ids` first, so this is only reachable through misuse and keeps the
/// function total.
pub fn add_to_index<K: Eq + Clone>(ids: &[K], bucket: &mut Vec<K>, key: &K) {
    if bucket.contains(key) {
        return;
    }
    let key_pos = match ids.iter().position(|k| k == key) {
        Some(pos) => pos,
        None => {
            bucket.push(key.clone());
            return;
        }
    };
    // Bucket order matches ids order, so positions are increasing and the
    // insertion point is a partition point.
    let insert_at = bucket.partition_point(|b| {
        ids.iter().position(|k| k == b).is_some_and(|pos| pos < key_pos)
    });
    bucket.insert(insert_at, key.clone());
}
