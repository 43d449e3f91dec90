use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A high-level, user-facing concern grouping.
///
/// `maps_to_photos` keywords are matched against free-text case names and
/// matching criteria; `maps_to_specific_issues` keywords are matched against
/// the structured issue fields. The catalog guarantees `maps_to_photos` is
/// non-empty; an empty `maps_to_specific_issues` disables issue matching for
/// the category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub display_name: String,
    pub maps_to_photos: Vec<String>,
    pub maps_to_specific_issues: Vec<String>,
}
