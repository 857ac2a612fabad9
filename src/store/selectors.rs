//! Read-only projections of the answers document, one per step.

use super::action::{BasicsData, HealthData};
use super::answers::FormAnswers;

/// Basics slice with the date of birth pulled to the top level.
pub fn basics_view(answers: &FormAnswers) -> BasicsData {
    BasicsData {
        first_name: answers.first_name.clone(),
        last_name: answers.last_name.clone(),
        gender: answers.gender,
        date: answers.dob.date.clone(),
        month: answers.dob.month.clone(),
        year: answers.dob.year.clone(),
    }
}

/// Health slice with height flattened.
pub fn health_view(answers: &FormAnswers) -> HealthData {
    HealthData {
        height_feet: answers.height.feet.clone(),
        height_inches: answers.height.inches.clone(),
        weight: answers.weight.clone(),
        tobacco: answers.tobacco,
    }
}

/// The whole document, as shown on the confirmation screen.
pub fn full_view(answers: &FormAnswers) -> FormAnswers {
    answers.clone()
}
