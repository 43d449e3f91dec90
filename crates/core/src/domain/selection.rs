use serde::{Deserialize, Serialize};

use crate::domain::area::Area;
use crate::domain::case::{EthnicBackground, SkinTone, SkinType};
use crate::domain::category::CategoryId;
use crate::errors::DomainError;

/// Maximum concern categories a quiz selection may hold.
pub const MAX_SELECTED_CONCERNS: usize = 3;
/// Maximum body/face areas a quiz selection may hold.
pub const MAX_SELECTED_AREAS: usize = 3;

/// Quiz age-range bucket.
///
/// Midpoints are fixed integers so that the age scoring step function is
/// exact: a 45-year-old case scores a full age match against `40-49`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeRange {
    From18To29,
    From30To39,
    From40To49,
    From50To59,
    Over60,
}

impl AgeRange {
    pub const ALL: [AgeRange; 5] = [
        AgeRange::From18To29,
        AgeRange::From30To39,
        AgeRange::From40To49,
        AgeRange::From50To59,
        AgeRange::Over60,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::From18To29 => "18-29",
            Self::From30To39 => "30-39",
            Self::From40To49 => "40-49",
            Self::From50To59 => "50-59",
            Self::Over60 => "60+",
        }
    }

    pub fn midpoint(&self) -> u8 {
        match self {
            Self::From18To29 => 24,
            Self::From30To39 => 35,
            Self::From40To49 => 45,
            Self::From50To59 => 55,
            Self::Over60 => 65,
        }
    }

    /// Bucket an exact age. Ages under 18 fall outside every bucket.
    pub fn containing(age: u8) -> Option<Self> {
        match age {
            18..=29 => Some(Self::From18To29),
            30..=39 => Some(Self::From30To39),
            40..=49 => Some(Self::From40To49),
            50..=59 => Some(Self::From50To59),
            60.. => Some(Self::Over60),
            _ => None,
        }
    }
}

impl std::str::FromStr for AgeRange {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "18-29" => Ok(Self::From18To29),
            "30-39" => Ok(Self::From30To39),
            "40-49" => Ok(Self::From40To49),
            "50-59" => Ok(Self::From50To59),
            "60+" | "60 +" => Ok(Self::Over60),
            _ => Err(DomainError::UnknownEnumValue { kind: "age range", value: value.to_owned() }),
        }
    }
}

/// The quiz state handed to the core for each scoring pass.
///
/// Mutated incrementally by the quiz UI, passed by value into the core, never
/// mutated there. The `MAX_SELECTED_*` invariants are enforced here, at the
/// single point where selections enter the domain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSelection {
    concerns: Vec<CategoryId>,
    areas: Vec<Area>,
    age_range: Option<AgeRange>,
    skin_type: Option<SkinType>,
    skin_tone: Option<SkinTone>,
    ethnic_background: Option<EthnicBackground>,
}

impl UserSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a concern category. Duplicate selections are ignored; a fourth
    /// distinct concern is rejected.
    pub fn select_concern(&mut self, id: CategoryId) -> Result<(), DomainError> {
        if self.concerns.contains(&id) {
            return Ok(());
        }
        if self.concerns.len() >= MAX_SELECTED_CONCERNS {
            return Err(DomainError::SelectionLimitExceeded {
                kind: "concerns",
                limit: MAX_SELECTED_CONCERNS,
            });
        }
        self.concerns.push(id);
        Ok(())
    }

    pub fn select_area(&mut self, area: Area) -> Result<(), DomainError> {
        if self.areas.contains(&area) {
            return Ok(());
        }
        if self.areas.len() >= MAX_SELECTED_AREAS {
            return Err(DomainError::SelectionLimitExceeded {
                kind: "areas",
                limit: MAX_SELECTED_AREAS,
            });
        }
        self.areas.push(area);
        Ok(())
    }

    pub fn with_concerns<I>(mut self, ids: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = CategoryId>,
    {
        for id in ids {
            self.select_concern(id)?;
        }
        Ok(self)
    }

    pub fn with_areas<I>(mut self, areas: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = Area>,
    {
        for area in areas {
            self.select_area(area)?;
        }
        Ok(self)
    }

    pub fn set_age_range(&mut self, age_range: Option<AgeRange>) {
        self.age_range = age_range;
    }

    pub fn set_skin_type(&mut self, skin_type: Option<SkinType>) {
        self.skin_type = skin_type;
    }

    pub fn set_skin_tone(&mut self, skin_tone: Option<SkinTone>) {
        self.skin_tone = skin_tone;
    }

    pub fn set_ethnic_background(&mut self, background: Option<EthnicBackground>) {
        self.ethnic_background = background;
    }

    pub fn concerns(&self) -> &[CategoryId] {
        &self.concerns
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn age_range(&self) -> Option<AgeRange> {
        self.age_range
    }

    pub fn skin_type(&self) -> Option<SkinType> {
        self.skin_type
    }

    pub fn skin_tone(&self) -> Option<SkinTone> {
        self.skin_tone
    }

    pub fn ethnic_background(&self) -> Option<EthnicBackground> {
        self.ethnic_background
    }
}
