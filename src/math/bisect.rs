//! Nearest-point lookup in a sorted series.

/// First index whose key is `>= target` (`items` sorted ascending by key).
pub fn bisect_left<T>(items: &[T], target: f64, key: impl Fn(&T) -> f64) -> usize {
    items.partition_point(|item| key(item) < target)
}

/// Index of the item whose key is closest to `target`.
///
/// Only the two neighbours around the bisection point are compared. When both
/// are exactly equidistant the later one wins.
pub fn nearest_index<T>(items: &[T], target: f64, key: impl Fn(&T) -> f64) -> Option<usize> {
    if items.is_empty() {
        return None;
    }
    let i = bisect_left(items, target, &key);
    if i == 0 {
        return Some(0);
    }
    if i >= items.len() {
        return Some(items.len() - 1);
    }
    let before = target - key(&items[i - 1]);
    let after = key(&items[i]) - target;
    Some(if before >= after { i } else { i - 1 })
}
