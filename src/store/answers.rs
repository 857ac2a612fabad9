use serde::{Deserialize, Serialize};

/// Gender as collected on the Basics step. `None` in the document means unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn display_name(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateOfBirth {
    pub date: String,
    pub month: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Height {
    pub feet: String,
    pub inches: String,
}

/// The accumulated wizard answers. This is the unit of persistence.
///
/// Every field falls back to its default when absent from a stored document,
/// so documents written before a field existed still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormAnswers {
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub dob: DateOfBirth,
    pub height: Height,
    pub weight: String,
    pub tobacco: bool,
}

impl FormAnswers {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
