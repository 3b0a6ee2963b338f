use crate::{
    db::Store, error::InternalError, obs::sink::MetricsEvent, traits::EntityKind, value::Value,
};
use std::fmt;

///
/// Peek
///
/// Non-resolving view of a to-one cache. `Unresolved` means no lookup has
/// run since construction, bind or reset.
///

#[derive(Debug, Eq, PartialEq)]
pub enum Peek<'a, T> {
    Unresolved,
    Absent,
    Present(&'a T),
}

impl<T> Peek<'_, T> {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

#[derive(Clone, Debug)]
enum Slot<T> {
    Unresolved,
    Absent,
    Present(T),
}

///
/// ToOne
///
/// Lazy reference to at most one `T`, keyed by the target's primary key.
/// A target id of 0 means "no target" and resolves without a lookup.
///

#[derive(Clone)]
pub struct ToOne<T: EntityKind> {
    target_id: u64,
    store: Option<Store>,
    slot: Slot<T>,
}

impl<T: EntityKind> ToOne<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_target_id(0)
    }

    /// Proxy for a known target id, as read back from a stored record.
    #[must_use]
    pub const fn with_target_id(target_id: u64) -> Self {
        Self {
            target_id,
            store: None,
            slot: Slot::Unresolved,
        }
    }

    #[must_use]
    pub const fn target_id(&self) -> u64 {
        self.target_id
    }

    /// Foreign-key value for the owner's record; null when there is no target.
    #[must_use]
    pub const fn to_value(&self) -> Value {
        if self.target_id == 0 {
            Value::Null
        } else {
            Value::from_id(self.target_id)
        }
    }

    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.store.is_some()
    }

    /// Current cache state. Never issues a lookup.
    #[must_use]
    pub const fn peek(&self) -> Peek<'_, T> {
        match &self.slot {
            Slot::Unresolved => Peek::Unresolved,
            Slot::Absent => Peek::Absent,
            Slot::Present(target) => Peek::Present(target),
        }
    }

    /// Resolve on first call and cache the outcome, including "absent".
    pub fn get(&mut self) -> Result<Option<&T>, InternalError> {
        if matches!(self.slot, Slot::Unresolved) {
            self.slot = self.resolve()?;
        }

        match &self.slot {
            Slot::Present(target) => Ok(Some(target)),
            Slot::Absent | Slot::Unresolved => Ok(None),
        }
    }

    fn resolve(&self) -> Result<Slot<T>, InternalError> {
        if self.target_id == 0 {
            return Ok(Slot::Absent);
        }

        let store = self
            .store
            .as_ref()
            .ok_or_else(|| InternalError::relation_unbound(T::MODEL.entity_name))?;
        let target = store.boxed::<T>()?.get(self.target_id)?;

        if store.debug_enabled() {
            tracing::debug!(
                entity = T::MODEL.entity_name,
                target_id = self.target_id,
                found = target.is_some(),
                "resolve to-one"
            );
        }
        store.emit(MetricsEvent::RelationResolve {
            target_name: T::MODEL.entity_name,
            rows: u64::from(target.is_some()),
        });

        Ok(target.map_or(Slot::Absent, Slot::Present))
    }

    /// Point at an already-persisted target and cache it.
    pub fn set(&mut self, target: T) -> Result<(), InternalError> {
        let id = target.id();
        if id == 0 {
            return Err(InternalError::relation_unsaved_target(T::MODEL.entity_name));
        }

        self.target_id = id;
        self.slot = Slot::Present(target);

        Ok(())
    }

    /// Change the target id. The cache is refreshed on the next `get`.
    pub fn set_target_id(&mut self, target_id: u64) {
        if target_id != self.target_id {
            self.target_id = target_id;
            self.slot = if target_id == 0 {
                Slot::Absent
            } else {
                Slot::Unresolved
            };
        }
    }

    /// Drop the reference entirely.
    pub fn clear(&mut self) {
        self.target_id = 0;
        self.slot = Slot::Absent;
    }

    /// Drop the cache; the next `get` looks the target up again.
    pub fn reset(&mut self) {
        self.slot = Slot::Unresolved;

        if let Some(store) = &self.store {
            store.emit(MetricsEvent::RelationReset {
                target_name: T::MODEL.entity_name,
            });
        }
    }

    /// Bind to a live store and drop any cached state.
    pub fn bind(&mut self, store: &Store) {
        self.store = Some(store.clone());
        self.slot = Slot::Unresolved;
    }
}

impl<T: EntityKind> Default for ToOne<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: EntityKind + fmt::Debug> fmt::Debug for ToOne<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToOne")
            .field("target", &T::MODEL.entity_name)
            .field("target_id", &self.target_id)
            .field("bound", &self.store.is_some())
            .field("slot", &self.slot)
            .finish()
    }
}
