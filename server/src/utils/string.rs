//! String utility functions

/// Default maximum length for log previews (in characters)
pub const PREVIEW_MAX_LENGTH: usize = 200;

/// Truncate text to max length with ellipsis
pub fn truncate_preview(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if text.chars().count() > max_len {
        format!("{}...", text.chars().take(max_len).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_preview_short() {
        assert_eq!(truncate_preview("  short  ", 10), "short");
    }

    #[test]
    fn test_truncate_preview_long() {
        assert_eq!(truncate_preview("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_truncate_preview_multibyte() {
        assert_eq!(truncate_preview("ééééé", 2), "éé...");
    }
}
