use regex::Regex;

use super::{GENERAL_CONCERN, GENERAL_TREATMENT};
use crate::catalog::TREATMENT_TOKENS;

/// Derives display labels from raw case names.
///
/// `concern` strips treatment-method wording ("with ...", a trailing method
/// token, "using ...", "via ...") and title-cases what remains; `treatment`
/// captures the method instead. Both are pure string transforms; `concern` is
/// idempotent (the strip rules run to a fixpoint, preserving their fixed
/// per-pass order).
#[derive(Clone, Debug)]
pub struct ConcernExtractor {
    with_clause: Option<Regex>,
    token_suffix: Option<Regex>,
    using_clause: Option<Regex>,
    via_clause: Option<Regex>,
    with_capture: Option<Regex>,
    token_capture: Option<Regex>,
}

impl ConcernExtractor {
    pub fn new() -> Self {
        Self::with_tokens(TREATMENT_TOKENS)
    }

    /// Build against a custom treatment-method token table.
    pub fn with_tokens(tokens: &[&str]) -> Self {
        let alternation =
            tokens.iter().map(|token| regex::escape(token)).collect::<Vec<_>>().join("|");
        Self {
            with_clause: Regex::new(r"(?i)\s+with\b.*$").ok(),
            token_suffix: Regex::new(&format!(r"(?i)\s+(?:{alternation})\s*$")).ok(),
            using_clause: Regex::new(r"(?i)\s+using\b.*$").ok(),
            via_clause: Regex::new(r"(?i)\s+via\b.*$").ok(),
            with_capture: Regex::new(r"(?i)\s+with\s+(.+?)(?:\s+(?:for|to)\s.*)?$").ok(),
            token_capture: Regex::new(&format!(r"(?i)(?:^|\s)({alternation})\s*$")).ok(),
        }
    }

    /// The case's name with treatment-method wording stripped, title-cased.
    pub fn concern(&self, name: &str) -> String {
        let mut out = name.trim().to_owned();
        loop {
            let next = self.strip_once(&out);
            if next == out {
                break;
            }
            out = next;
        }
        let titled = title_case(&out);
        if titled.is_empty() {
            GENERAL_CONCERN.to_owned()
        } else {
            titled
        }
    }

    // One pass of the strip rules, in their fixed order.
    fn strip_once(&self, input: &str) -> String {
        let rules =
            [&self.with_clause, &self.token_suffix, &self.using_clause, &self.via_clause];
        let mut out = input.to_owned();
        for rule in rules.into_iter().flatten() {
            out = rule.replace(&out, "").trim().to_owned();
        }
        out
    }

    /// The procedure name extracted from the case's title, title-cased.
    pub fn treatment(&self, name: &str) -> String {
        let name = name.trim();
        if let Some(captures) = self.with_capture.as_ref().and_then(|re| re.captures(name)) {
            if let Some(matched) = captures.get(1) {
                let captured = matched.as_str().trim();
                if !captured.is_empty() {
                    return title_case(captured);
                }
            }
        }
        if let Some(captures) = self.token_capture.as_ref().and_then(|re| re.captures(name)) {
            if let Some(matched) = captures.get(1) {
                return title_case(matched.as_str());
            }
        }
        GENERAL_TREATMENT.to_owned()
    }
}

impl Default for ConcernExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
