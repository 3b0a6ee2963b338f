use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Ephemeral, in-memory counters for builder, query and relation activity.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            entities: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Builder lifecycle
    pub builders_opened: u64,
    pub builders_closed: u64,
    pub builders_leaked: u64,

    // Compiled queries
    pub queries_built: u64,
    pub queries_closed: u64,
    pub find_calls: u64,
    pub rows_loaded: u64,

    // Writes
    pub puts: u64,
    pub rows_removed: u64,

    // Relations
    pub relation_resolves: u64,
    pub relation_resets: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub builders_opened: u64,
    pub builders_leaked: u64,
    pub queries_built: u64,
    pub find_calls: u64,
    pub rows_loaded: u64,
    pub puts: u64,
    pub rows_removed: u64,
    pub relation_resolves: u64,
}

///
/// EventReport
/// Snapshot handed to callers; detached from the live state.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: EventState,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Build a report from the current state.
#[must_use]
pub fn report() -> EventReport {
    EventReport {
        counters: with_state(Clone::clone),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
