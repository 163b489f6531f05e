//! Star-rating text parsing shared by product extraction and review aggregation.

/// Parses the leading numeric token of a star-rating display string.
///
/// `"4.0 out of 5 stars"` yields `Some(4.0)`. Only the first
/// whitespace-delimited token is considered and only its numeric prefix is
/// read, so `"4.5stars"` yields `Some(4.5)` while `"bad"`, `""` and
/// `"NaN out of 5"` yield `None`. The result is always finite.
#[must_use]
pub fn parse_star_rating(raw: &str) -> Option<f64> {
    let token = raw.split_whitespace().next()?;

    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in token.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }

    if end == 0 {
        return None;
    }

    token[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
