use regex::Regex;

/// A tolerant, case-insensitive matcher for one catalog keyword.
///
/// Runs of whitespace, hyphens, and underscores inside the keyword are
/// interchangeable and of variable length, so `under-eye` matches
/// `under eye` and `under_eye`. Matching tries a cheap lower-cased substring
/// check first and falls back to the compiled separator-tolerant pattern;
/// either success suffices.
#[derive(Clone, Debug)]
pub struct KeywordPattern {
    keyword: String,
    lowered: String,
    relaxed: Option<Regex>,
}

impl KeywordPattern {
    pub fn new(keyword: &str) -> Self {
        let keyword = keyword.trim().to_owned();
        let lowered = keyword.to_lowercase();
        let relaxed = build_relaxed(&keyword);
        Self { keyword, lowered, relaxed }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn is_match(&self, text: &str) -> bool {
        if self.lowered.is_empty() || text.is_empty() {
            return false;
        }
        if text.to_lowercase().contains(&self.lowered) {
            return true;
        }
        self.relaxed.as_ref().is_some_and(|relaxed| relaxed.is_match(text))
    }
}

fn build_relaxed(keyword: &str) -> Option<Regex> {
    let parts: Vec<&str> = keyword
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }
    let body = parts.iter().map(|part| regex::escape(part)).collect::<Vec<_>>().join(r"[\s_-]+");
    Regex::new(&format!("(?i){body}")).ok()
}
