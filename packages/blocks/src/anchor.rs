//! Anchor ids for `#fragment` deep links

/// Lowercase, ASCII alphanumerics and single hyphens, no leading or
/// trailing hyphen. Returns an empty string when nothing survives.
pub fn sanitize_anchor(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// In-page link for an anchor (`#anchor`)
pub fn fragment(anchor: &str) -> String {
    format!("#{}", anchor)
}

/// True when `anchor` is already in sanitized form
pub fn is_sanitized(anchor: &str) -> bool {
    !anchor.is_empty() && sanitize_anchor(anchor) == anchor
}
