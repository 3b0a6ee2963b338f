use crate::obs::sink::MetricsSink;
use std::fmt;

///
/// StoreConfig
///
/// Per-store policy: debug logging and an optional metrics sink that
/// replaces the thread-local default for every event the store emits.
///

#[derive(Clone, Copy, Default)]
pub struct StoreConfig {
    pub debug: bool,
    pub metrics: Option<&'static dyn MetricsSink>,
}

impl StoreConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            debug: false,
            metrics: None,
        }
    }

    /// Log every forwarded condition and order directive.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("debug", &self.debug)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
