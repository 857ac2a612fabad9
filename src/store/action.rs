use std::fmt;

use serde::{Deserialize, Serialize};

use super::answers::{DateOfBirth, FormAnswers, Gender, Height};

/// Payload of `ADD_BASICS`: the Basics step's fields, with the date of birth flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicsData {
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub date: String,
    pub month: String,
    pub year: String,
}

/// Payload of `ADD_HEALTH`: the Health step's fields, with height flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub height_feet: String,
    pub height_inches: String,
    pub weight: String,
    pub tobacco: bool,
}

/// Every way the answers document can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddBasics(BasicsData),
    AddHealth(HealthData),
    Clear,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::AddBasics(_) => ActionKind::AddBasics,
            Action::AddHealth(_) => ActionKind::AddHealth,
            Action::Clear => ActionKind::Clear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    AddBasics,
    AddHealth,
    Clear,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::AddBasics => "ADD_BASICS",
            ActionKind::AddHealth => "ADD_HEALTH",
            ActionKind::Clear => "CLEAR",
        };
        f.write_str(name)
    }
}

/// Apply `action` to `state`, producing the next document.
///
/// Each action only touches its own slice; everything else is carried over.
pub fn reduce(state: &FormAnswers, action: &Action) -> FormAnswers {
    match action {
        Action::AddBasics(data) => FormAnswers {
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            gender: data.gender,
            dob: DateOfBirth {
                date: data.date.clone(),
                month: data.month.clone(),
                year: data.year.clone(),
            },
            ..state.clone()
        },
        Action::AddHealth(data) => FormAnswers {
            height: Height {
                feet: data.height_feet.clone(),
                inches: data.height_inches.clone(),
            },
            weight: data.weight.clone(),
            tobacco: data.tobacco,
            ..state.clone()
        },
        Action::Clear => FormAnswers::default(),
    }
}
