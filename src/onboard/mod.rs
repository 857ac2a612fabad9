//! The profile wizard: three steps (basics, health, confirm) driven by vim-style
//! keys, each committing its answers through an asynchronous operation before
//! they reach the store.

mod app;
mod commit;
mod config;
mod error;
mod form;
mod steps;
pub mod ui;
mod widgets;

pub use app::{Message, WizardApp};
pub use commit::{
    CommitError, CommitOutcome, CommitPayload, CommitRunner, CommitState, Committer,
    SimulatedCommitter,
};
pub use config::{CommitConfig, GeneralConfig, StepsConfig, StorageConfig, WizardConfig};
pub use error::{OnboardError, Result};
pub use form::{FieldBox, FieldFocus, FieldKind, Form, TextInput, REQUIRED_MESSAGE};
pub use steps::{
    default_steps, BasicsStep, ConfirmStep, HealthStep, Step, StepContext, StepId, SubmitOutcome,
};
pub use widgets::StatusBarState;
