use serde::{Deserialize, Serialize};

/// How a category name is tested against a filename's tag text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMatch {
    /// The category matches if it appears anywhere in the text after the first `[`.
    /// `moon` matches `[moonlight]`, and trailing text after `]` is searched too.
    #[default]
    Substring,
    /// The bracketed text is split on commas and each trimmed tag compared for equality.
    Exact,
}

/// Returns the tag-search text of a filename: everything after the first `[`,
/// closing bracket and extension included. `None` if the name carries no tags.
pub fn tag_text(filename: &str) -> Option<&str> {
    let (_, rest) = filename.split_once('[')?;
    if rest.is_empty() {
        return None;
    }
    Some(rest)
}

/// Splits tag text into trimmed tags, stopping at the first `]`.
pub fn parse_tags(text: &str) -> Vec<&str> {
    let inner = match text.split_once(']') {
        Some((inner, _)) => inner,
        None => text,
    };
    inner
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

impl TagMatch {
    pub fn matches(self, text: &str, category: &str) -> bool {
        if category.is_empty() {
            return false;
        }
        match self {
            TagMatch::Substring => text.contains(category),
            TagMatch::Exact => parse_tags(text).contains(&category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_bracket_means_no_tags() {
        assert_eq!(tag_text("plain sound.mp3"), None);
        assert_eq!(tag_text("trailing ["), None);
    }

    #[test]
    fn tag_text_keeps_remainder() {
        assert_eq!(tag_text("a [x, y].mp3"), Some("x, y].mp3"));
        assert_eq!(tag_text("a [x] [y].mp3"), Some("x] [y].mp3"));
    }

    #[test]
    fn substring_matching_is_loose() {
        let text = tag_text("sheesh [good wow, moonlight].mp3").unwrap();
        assert!(TagMatch::Substring.matches(text, "moon"));
        assert!(TagMatch::Substring.matches(text, "wow"));
        assert!(TagMatch::Substring.matches(text, "mp3"));
    }

    #[test]
    fn exact_matching_compares_whole_tags() {
        let text = tag_text("sheesh [good wow, moonlight].mp3").unwrap();
        assert!(!TagMatch::Exact.matches(text, "moon"));
        assert!(!TagMatch::Exact.matches(text, "wow"));
        assert!(TagMatch::Exact.matches(text, "good wow"));
        assert!(TagMatch::Exact.matches(text, "moonlight"));
    }

    #[test]
    fn empty_category_never_matches() {
        assert!(!TagMatch::Substring.matches("x].mp3", ""));
    }
}
