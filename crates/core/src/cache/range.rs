/// Resolves a Redis-style inclusive index range against a collection of `len`
/// elements.
///
/// Negative indices count from the end (`-1` is the last element). Returns
/// `None` when the range selects nothing, otherwise the clamped
/// `(start, stop)` pair with `start <= stop < len`.
pub fn normalize_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    if len == 0 {
        return None;
    }

    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}
