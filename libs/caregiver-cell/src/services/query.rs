use crate::models::{Language, SearchError, SearchQuery};

/// Trims, lower-cases and collapses runs of whitespace.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds a `SearchQuery` from raw request parameters, rejecting blank input.
pub fn parse_query(raw: Option<&str>, lang: Option<&str>) -> Result<SearchQuery, SearchError> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    Ok(SearchQuery {
        text: text.to_string(),
        language: Language::from_tag(lang),
    })
}

/// True when any trigger appears in the already-normalized query.
pub fn contains_any(normalized: &str, triggers: &[&str]) -> bool {
    triggers.iter().any(|t| normalized.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  My   Mother is\tELDERLY \n"), "my mother is elderly");
    }

    #[test]
    fn blank_query_is_rejected() {
        assert_matches!(parse_query(None, None), Err(SearchError::EmptyQuery));
        assert_matches!(parse_query(Some(""), None), Err(SearchError::EmptyQuery));
        assert_matches!(parse_query(Some("   "), Some("hi")), Err(SearchError::EmptyQuery));
    }

    #[test]
    fn parse_query_keeps_original_text() {
        let query = parse_query(Some(" I have a Wound "), Some("hi")).unwrap();
        assert_eq!(query.text, "I have a Wound");
        assert_eq!(query.language, Language::Hi);
    }

    #[test]
    fn contains_any_matches_substrings() {
        assert!(contains_any("i am pregnant", &["pregnan"]));
        assert!(!contains_any("knee pain", &["wound", "elder"]));
    }
}
