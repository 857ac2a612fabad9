//! Step-wizard navigation: which step is active, and the indicator strip.

mod controller;

pub use controller::{
    resolve_target, step_markers, MarkerState, Navigator, StepDescriptor, StepMarker,
    WizardController,
};
