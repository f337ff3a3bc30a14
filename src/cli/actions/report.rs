use crate::{
    forms::{FieldErrors, SubmitOutcome, WizardStep},
    navigation::{Destination, Navigator, TracingNavigator},
};
use anyhow::Result;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// Logs like [`TracingNavigator`] and remembers where the run ended up.
#[derive(Debug, Default)]
pub(super) struct RecordingNavigator {
    last: Mutex<Option<Destination>>,
}

impl RecordingNavigator {
    pub(super) fn last(&self) -> Option<Destination> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        TracingNavigator.navigate(destination);
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(destination);
    }
}

/// Summary printed to stdout at the end of a run.
#[derive(Debug, Serialize)]
pub(super) struct Report {
    workflow: &'static str,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<WizardStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<Destination>,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    errors: FieldErrors,
}

impl Report {
    pub(super) fn new(
        workflow: &'static str,
        outcome: &SubmitOutcome,
        step: Option<WizardStep>,
        destination: Option<Destination>,
    ) -> Self {
        Self {
            workflow,
            outcome: outcome.label(),
            step,
            destination,
            errors: outcome.field_errors().cloned().unwrap_or_default(),
        }
    }

    pub(super) fn print(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}
