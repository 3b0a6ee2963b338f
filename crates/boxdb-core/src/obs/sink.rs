//! Metrics sink boundary.
//!
//! Builder, query and relation code MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::obs::metrics;
use std::cell::Cell;

thread_local! {
    static SINK_OVERRIDE: Cell<Option<&'static dyn MetricsSink>> = const { Cell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    BuilderOpen {
        entity_name: &'static str,
    },
    BuilderClose {
        entity_name: &'static str,
    },
    BuilderLeak {
        entity_name: &'static str,
    },
    QueryBuild {
        entity_name: &'static str,
    },
    QueryClose {
        entity_name: &'static str,
    },
    Find {
        entity_name: &'static str,
        rows: u64,
    },
    Put {
        entity_name: &'static str,
    },
    Remove {
        entity_name: &'static str,
        rows: u64,
    },
    RelationResolve {
        target_name: &'static str,
        rows: u64,
    },
    RelationReset {
        target_name: &'static str,
    },
}

impl MetricsEvent {
    /// Entity the event is attributed to.
    #[must_use]
    pub const fn entity_name(&self) -> &'static str {
        match *self {
            Self::BuilderOpen { entity_name }
            | Self::BuilderClose { entity_name }
            | Self::BuilderLeak { entity_name }
            | Self::QueryBuild { entity_name }
            | Self::QueryClose { entity_name }
            | Self::Find { entity_name, .. }
            | Self::Put { entity_name }
            | Self::Remove { entity_name, .. } => entity_name,
            Self::RelationResolve { target_name, .. } | Self::RelationReset { target_name } => {
                target_name
            }
        }
    }
}

///
/// MetricsSink
///

pub trait MetricsSink: Sync {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| {
            let entry = m
                .entities
                .entry(event.entity_name().to_string())
                .or_default();

            match event {
                MetricsEvent::BuilderOpen { .. } => {
                    m.ops.builders_opened = m.ops.builders_opened.saturating_add(1);
                    entry.builders_opened = entry.builders_opened.saturating_add(1);
                }
                MetricsEvent::BuilderClose { .. } => {
                    m.ops.builders_closed = m.ops.builders_closed.saturating_add(1);
                }
                MetricsEvent::BuilderLeak { .. } => {
                    m.ops.builders_leaked = m.ops.builders_leaked.saturating_add(1);
                    entry.builders_leaked = entry.builders_leaked.saturating_add(1);
                }
                MetricsEvent::QueryBuild { .. } => {
                    m.ops.queries_built = m.ops.queries_built.saturating_add(1);
                    entry.queries_built = entry.queries_built.saturating_add(1);
                }
                MetricsEvent::QueryClose { .. } => {
                    m.ops.queries_closed = m.ops.queries_closed.saturating_add(1);
                }
                MetricsEvent::Find { rows, .. } => {
                    m.ops.find_calls = m.ops.find_calls.saturating_add(1);
                    m.ops.rows_loaded = m.ops.rows_loaded.saturating_add(rows);
                    entry.find_calls = entry.find_calls.saturating_add(1);
                    entry.rows_loaded = entry.rows_loaded.saturating_add(rows);
                }
                MetricsEvent::Put { .. } => {
                    m.ops.puts = m.ops.puts.saturating_add(1);
                    entry.puts = entry.puts.saturating_add(1);
                }
                MetricsEvent::Remove { rows, .. } => {
                    m.ops.rows_removed = m.ops.rows_removed.saturating_add(rows);
                    entry.rows_removed = entry.rows_removed.saturating_add(rows);
                }
                MetricsEvent::RelationResolve { .. } => {
                    m.ops.relation_resolves = m.ops.relation_resolves.saturating_add(1);
                    entry.relation_resolves = entry.relation_resolves.saturating_add(1);
                }
                MetricsEvent::RelationReset { .. } => {
                    m.ops.relation_resets = m.ops.relation_resets.saturating_add(1);
                }
            }
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    match SINK_OVERRIDE.with(Cell::get) {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
/// The previous sink is restored on every exit, including unwind.
pub fn with_metrics_sink<T>(sink: &'static dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<&'static dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| cell.set(self.0));
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.replace(Some(sink)));
    let _guard = Guard(prev);

    f()
}
