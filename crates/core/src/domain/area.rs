use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Coarse body/face region used as an optional filter dimension, independent
/// of concern categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Forehead,
    Eyes,
    Nose,
    Cheeks,
    Lips,
    Jawline,
    Neck,
    Abdomen,
    Arms,
    Thighs,
}

impl Area {
    pub const ALL: [Area; 10] = [
        Area::Forehead,
        Area::Eyes,
        Area::Nose,
        Area::Cheeks,
        Area::Lips,
        Area::Jawline,
        Area::Neck,
        Area::Abdomen,
        Area::Arms,
        Area::Thighs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Forehead => "Forehead",
            Self::Eyes => "Eyes",
            Self::Nose => "Nose",
            Self::Cheeks => "Cheeks",
            Self::Lips => "Lips",
            Self::Jawline => "Jawline",
            Self::Neck => "Neck",
            Self::Abdomen => "Abdomen",
            Self::Arms => "Arms",
            Self::Thighs => "Thighs",
        }
    }
}

impl std::str::FromStr for Area {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "forehead" => Ok(Self::Forehead),
            "eyes" => Ok(Self::Eyes),
            "nose" => Ok(Self::Nose),
            "cheeks" => Ok(Self::Cheeks),
            "lips" => Ok(Self::Lips),
            "jawline" => Ok(Self::Jawline),
            "neck" => Ok(Self::Neck),
            "abdomen" => Ok(Self::Abdomen),
            "arms" => Ok(Self::Arms),
            "thighs" => Ok(Self::Thighs),
            _ => Err(DomainError::UnknownEnumValue { kind: "area", value: value.to_owned() }),
        }
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::Area;

    #[test]
    fn every_area_round_trips_through_its_label() {
        for area in Area::ALL {
            assert_eq!(area.label().parse::<Area>().unwrap(), area);
        }
    }

    #[test]
    fn unknown_area_is_rejected() {
        assert!("elbow".parse::<Area>().is_err());
    }
}
