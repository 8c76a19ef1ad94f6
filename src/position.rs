//! Insertion-index normalization shared by every insert primitive.

/// Map a caller-supplied insertion position onto a valid index in `[0, len]`.
///
/// Negative positions mean "append" (a `-1` convention carried by all callers),
/// positions past the end clamp to the end, and anything else passes through
/// unchanged. Statement lists, parameter lists, and argument lists all share
/// this rule, so out-of-range inputs behave identically everywhere.
pub fn normalize_pos(pos: isize, len: usize) -> usize {
    if pos < 0 {
        return len;
    }
    let pos = pos as usize;
    if pos > len { len } else { pos }
}
