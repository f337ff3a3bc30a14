use crate::{
    backend::SimulatedBackend,
    cli::actions::report::RecordingNavigator,
    config::FormConfig,
    diagnostics::TracingSink,
    forms::FormServices,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Builds the collaborators for one CLI run. Ctrl-C tears the forms down.
pub(super) fn build(config: FormConfig) -> (FormServices<SimulatedBackend>, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let shutdown = CancellationToken::new();

    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                debug!("interrupt received, tearing forms down");
                on_signal.cancel();
            }
            Err(error) => warn!(%error, "unable to listen for interrupts"),
        }
    });

    let services = FormServices::new(
        Arc::new(SimulatedBackend::new(config.submit_delay())),
        navigator.clone(),
        Arc::new(TracingSink),
    )
    .with_config(config)
    .with_shutdown(shutdown);

    (services, navigator)
}
