//! Sink for submission failures. The forms never show these to the user; they
//! only land here.

use crate::backend::{EffectError, Operation};
use tracing::error;

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, operation: Operation, error: &EffectError);
}

/// Default sink: one `error!` event per failed submission.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, operation: Operation, error: &EffectError) {
        error!(%operation, "submission failed: {error}");
    }
}
