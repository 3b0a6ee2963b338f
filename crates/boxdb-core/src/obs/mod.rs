//! Observability: runtime event counters and the sink boundary that feeds them.

pub mod metrics;
pub mod sink;

pub use metrics::{EntityCounters, EventOps, EventReport};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
