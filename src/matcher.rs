use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid search pattern '{pattern}': {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

/// An ordered list of search terms compiled into a single alternation.
///
/// An empty term list compiles to the empty pattern, which matches every
/// description.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    regex: Regex,
}

impl CompiledMatcher {
    pub fn compile(searches: &[String]) -> Result<Self, PatternError> {
        let pattern = searches.join("|");
        Regex::new(&pattern)
            .map(|regex| Self { regex })
            .map_err(|e| PatternError {
                pattern,
                message: e.to_string(),
            })
    }

    /// Case-sensitive search anywhere in the description.
    pub fn is_match(&self, description: &str) -> bool {
        self.regex.is_match(description)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Escape a literal word so it can be used as a search term.
pub fn escape(word: &str) -> String {
    regex::escape(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_alternation_of_terms() {
        let m = CompiledMatcher::compile(&terms(&["Coffee", "ICA"])).unwrap();
        assert_eq!(m.as_str(), "Coffee|ICA");
        assert!(m.is_match("Coffee Shop"));
        assert!(m.is_match("ICA Nara"));
        assert!(!m.is_match("Rent"));
    }

    #[test]
    fn test_empty_terms_match_everything() {
        let m = CompiledMatcher::compile(&[]).unwrap();
        assert!(m.is_match("anything"));
        assert!(m.is_match(""));
    }

    #[test]
    fn test_case_sensitive() {
        let m = CompiledMatcher::compile(&terms(&["coffee"])).unwrap();
        assert!(!m.is_match("Coffee Shop"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = CompiledMatcher::compile(&terms(&["Coffee", "[unbalanced"])).unwrap_err();
        assert_eq!(err.pattern, "Coffee|[unbalanced");
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_escape_makes_word_literal() {
        let term = escape("A+B(1).");
        let m = CompiledMatcher::compile(&[term]).unwrap();
        assert!(m.is_match("Paid A+B(1). today"));
        assert!(!m.is_match("AAB11x"));
    }
}
