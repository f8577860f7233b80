//! Metric name sanitization

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
///
/// One output character per input character, so a non-empty name never
/// sanitizes to an empty one.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
