use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl CaseId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CaseId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Fitzpatrick skin phototype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinType {
    TypeI,
    TypeII,
    TypeIII,
    TypeIV,
    TypeV,
    TypeVI,
}

impl SkinType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TypeI => "Type I",
            Self::TypeII => "Type II",
            Self::TypeIII => "Type III",
            Self::TypeIV => "Type IV",
            Self::TypeV => "Type V",
            Self::TypeVI => "Type VI",
        }
    }
}

impl std::str::FromStr for SkinType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "i" | "1" | "type i" => Ok(Self::TypeI),
            "ii" | "2" | "type ii" => Ok(Self::TypeII),
            "iii" | "3" | "type iii" => Ok(Self::TypeIII),
            "iv" | "4" | "type iv" => Ok(Self::TypeIV),
            "v" | "5" | "type v" => Ok(Self::TypeV),
            "vi" | "6" | "type vi" => Ok(Self::TypeVI),
            _ => Err(DomainError::UnknownEnumValue { kind: "skin type", value: value.to_owned() }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinTone {
    Fair,
    Light,
    Medium,
    Olive,
    Brown,
    Dark,
}

impl SkinTone {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fair => "Fair",
            Self::Light => "Light",
            Self::Medium => "Medium",
            Self::Olive => "Olive",
            Self::Brown => "Brown",
            Self::Dark => "Dark",
        }
    }
}

impl std::str::FromStr for SkinTone {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "fair" => Ok(Self::Fair),
            "light" => Ok(Self::Light),
            "medium" => Ok(Self::Medium),
            "olive" => Ok(Self::Olive),
            "brown" => Ok(Self::Brown),
            "dark" | "deep" => Ok(Self::Dark),
            _ => Err(DomainError::UnknownEnumValue { kind: "skin tone", value: value.to_owned() }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EthnicBackground {
    African,
    EastAsian,
    SouthAsian,
    Hispanic,
    MiddleEastern,
    Caucasian,
    Mixed,
    Other,
}

impl EthnicBackground {
    pub fn label(&self) -> &'static str {
        match self {
            Self::African => "African",
            Self::EastAsian => "East Asian",
            Self::SouthAsian => "South Asian",
            Self::Hispanic => "Hispanic",
            Self::MiddleEastern => "Middle Eastern",
            Self::Caucasian => "Caucasian",
            Self::Mixed => "Mixed",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for EthnicBackground {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "african" | "black" => Ok(Self::African),
            "east asian" | "asian" => Ok(Self::EastAsian),
            "south asian" => Ok(Self::SouthAsian),
            "hispanic" | "latino" | "latina" => Ok(Self::Hispanic),
            "middle eastern" => Ok(Self::MiddleEastern),
            "caucasian" | "white" => Ok(Self::Caucasian),
            "mixed" => Ok(Self::Mixed),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::UnknownEnumValue {
                kind: "ethnic background",
                value: value.to_owned(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SunResponse {
    AlwaysBurns,
    UsuallyBurns,
    SometimesBurns,
    RarelyBurns,
    NeverBurns,
}

impl std::str::FromStr for SunResponse {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "always burns" => Ok(Self::AlwaysBurns),
            "usually burns" => Ok(Self::UsuallyBurns),
            "sometimes burns" => Ok(Self::SometimesBurns),
            "rarely burns" => Ok(Self::RarelyBurns),
            "never burns" | "tans easily" => Ok(Self::NeverBurns),
            _ => {
                Err(DomainError::UnknownEnumValue { kind: "sun response", value: value.to_owned() })
            }
        }
    }
}

/// One before/after treatment record from the external datastore.
///
/// Treated as immutable within a matching pass. Missing optional fields mean
/// "unknown" and degrade to partial credit or zero contribution in scoring;
/// they never raise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub name: String,
    #[serde(default)]
    pub headline: String,
    pub patient_age: Option<u8>,
    #[serde(default)]
    pub solved_issues: Vec<String>,
    #[serde(default)]
    pub matching_criteria: Vec<String>,
    #[serde(default)]
    pub direct_matching_issues: Vec<String>,
    pub skin_type: Option<SkinType>,
    pub skin_tone: Option<SkinTone>,
    pub ethnic_background: Option<EthnicBackground>,
    pub sun_response: Option<SunResponse>,
    pub surgical: Option<bool>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Case {
    /// Bare record with just an id and a name; every optional field unknown.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CaseId(id.into()),
            name: name.into(),
            headline: String::new(),
            patient_age: None,
            solved_issues: Vec::new(),
            matching_criteria: Vec::new(),
            direct_matching_issues: Vec::new(),
            skin_type: None,
            skin_tone: None,
            ethnic_background: None,
            sun_response: None,
            surgical: None,
            photo_urls: Vec::new(),
            created_at: None,
        }
    }

    pub fn is_surgical(&self) -> bool {
        self.surgical.unwrap_or(false)
    }
}

fn normalize_token(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
