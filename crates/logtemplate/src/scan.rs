//! Brace scanning for template compilation.
//!
//! Both functions work on bytes: every delimiter they look for is ASCII, so
//! the returned indices always fall on `char` boundaries of the source `str`.

/// Finds the delimiting brace in `text[start..end]`, honoring `{{`/`}}` escapes.
///
/// Consecutive braces are counted as a run. An even run is an escaped literal
/// and the search resumes after it; an odd run settles the search. For `{` the
/// last brace of the run is the delimiter, for `}` the first one, so that
/// `{{{Name}}}` reads as literal `{`, placeholder `{Name}`, literal `}`.
///
/// Returns `end` when no delimiter is found. A run that reaches `end` is
/// settled regardless of its parity.
pub(crate) fn find_brace_index(text: &[u8], brace: u8, start: usize, end: usize) -> usize {
    let mut brace_index = end;
    let mut run = 0usize;

    for (index, &ch) in text.iter().enumerate().take(end).skip(start) {
        if run > 0 && ch != brace {
            if run % 2 == 0 {
                run = 0;
                brace_index = end;
            } else {
                break;
            }
        } else if ch == brace {
            if brace == b'{' || run == 0 {
                brace_index = index;
            }
            run += 1;
        }
    }

    brace_index
}

/// Finds the first `ch` in `text[start..end]`, or `end` if absent.
pub(crate) fn find_index_of(text: &[u8], ch: u8, start: usize, end: usize) -> usize {
    text[start..end]
        .iter()
        .position(|&b| b == ch)
        .map_or(end, |offset| start + offset)
}
