//! Active-cursor arithmetic for a team roster. The roster itself lives with
//! the team systems; these rules only decide which slot stays active.

/// Next active index after a cycle input, wrapping around the roster.
pub fn next_active(active: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (active + 1) % len
}

/// Active index after removing `removed` from a roster that previously had
/// `new_len + 1` entries. Removing a slot before the cursor shifts it down
/// so the same remaining unit stays active; removing the active slot falls
/// through to the next one (clamped at the end). None means the roster is
/// now empty and no active-unit semantics apply.
pub fn active_after_removal(active: usize, removed: usize, new_len: usize) -> Option<usize> {
    if new_len == 0 {
        return None;
    }
    let shifted = if removed < active { active - 1 } else { active };
    Some(shifted.min(new_len - 1))
}
