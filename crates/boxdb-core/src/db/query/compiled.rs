use crate::{
    db::{engine::QueryHandle, store::EntityBox},
    error::InternalError,
    obs::sink::MetricsEvent,
    traits::EntityKind,
};
use std::fmt;

///
/// Query
///
/// Compiled, re-executable query. Owns its engine-side handle independently
/// of the builder that produced it. Every accessor re-runs against current
/// storage; nothing is cached between calls.
///
/// Execution takes `&self`, so one query may be shared across threads.
///

pub struct Query<E: EntityKind> {
    entity_box: EntityBox<E>,
    handle: Option<QueryHandle>,
}

impl<E: EntityKind> Query<E> {
    pub(crate) const fn new(entity_box: EntityBox<E>, handle: QueryHandle) -> Self {
        Self {
            entity_box,
            handle: Some(handle),
        }
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    fn live(&self) -> Result<QueryHandle, InternalError> {
        self.handle
            .ok_or_else(|| InternalError::query_closed(E::MODEL.entity_name))
    }

    /// All matches in compiled order.
    pub fn find(&self) -> Result<Vec<E>, InternalError> {
        let rows = self.entity_box.store().engine().find(self.live()?)?;
        self.emit_find(rows.len());

        rows.iter()
            .map(|row| self.entity_box.materialize(row))
            .collect()
    }

    /// First match in compiled order, if any.
    pub fn find_first(&self) -> Result<Option<E>, InternalError> {
        let row = self.entity_box.store().engine().find_first(self.live()?)?;
        self.emit_find(usize::from(row.is_some()));

        row.map(|row| self.entity_box.materialize(&row)).transpose()
    }

    /// The single match. `Ok(None)` when nothing matched; a conflict error
    /// when more than one row matched.
    pub fn find_unique(&self) -> Result<Option<E>, InternalError> {
        let row = self.entity_box.store().engine().find_unique(self.live()?)?;
        self.emit_find(usize::from(row.is_some()));

        row.map(|row| self.entity_box.materialize(&row)).transpose()
    }

    /// Primary keys of all matches, in compiled order.
    pub fn find_ids(&self) -> Result<Vec<u64>, InternalError> {
        let ids = self.entity_box.store().engine().find_ids(self.live()?)?;
        self.emit_find(ids.len());

        Ok(ids)
    }

    pub fn count(&self) -> Result<u64, InternalError> {
        self.entity_box.store().engine().count(self.live()?)
    }

    /// Delete every match and return how many rows were removed.
    pub fn remove(&self) -> Result<u64, InternalError> {
        let store = self.entity_box.store();
        let rows = store.engine().remove_matching(self.live()?)?;
        store.emit(MetricsEvent::Remove {
            entity_name: E::MODEL.entity_name,
            rows,
        });

        Ok(rows)
    }

    /// Engine rendering of the compiled conditions and order.
    pub fn describe(&self) -> Result<String, InternalError> {
        self.entity_box.store().engine().describe(self.live()?)
    }

    /// Release the query resource. Idempotent.
    pub fn close(&mut self) -> Result<(), InternalError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let store = self.entity_box.store();
        store.engine().destroy_query(handle)?;
        if store.debug_enabled() {
            tracing::debug!(entity = E::MODEL.entity_name, %handle, "close query");
        }
        store.emit(MetricsEvent::QueryClose {
            entity_name: E::MODEL.entity_name,
        });

        Ok(())
    }

    fn emit_find(&self, rows: usize) {
        self.entity_box.store().emit(MetricsEvent::Find {
            entity_name: E::MODEL.entity_name,
            rows: rows as u64,
        });
    }
}

impl<E: EntityKind> Drop for Query<E> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::error!(entity = E::MODEL.entity_name, error = %err, "query release failed");
        }
    }
}

impl<E: EntityKind> fmt::Debug for Query<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("entity", &E::MODEL.entity_name)
            .field("handle", &self.handle)
            .finish()
    }
}
