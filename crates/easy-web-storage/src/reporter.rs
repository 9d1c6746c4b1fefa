use tracing::error;

use crate::errors::StoreError;

/// Sink for failures a store recovers from locally.
#[cfg_attr(test, mockall::automock)]
pub trait Reporter {
    fn report(&self, error: &StoreError);
}

/// Emits every reported failure as a `tracing` error event.
#[derive(Clone, Copy, Default, Debug)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, error: &StoreError) {
        error!(error = %error, "web storage operation failed");
    }
}
