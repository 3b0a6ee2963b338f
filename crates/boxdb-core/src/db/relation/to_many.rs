use crate::{
    db::Store, error::InternalError, model::Property, obs::sink::MetricsEvent, traits::EntityKind,
};
use std::fmt;

///
/// ToMany
///
/// Lazy collection of every `T` whose backlink property points at the owner.
/// Resolves through the condition builder as
/// `equal(backlink, owner_id).order(primary key)` and caches the ordered
/// result until `reset` or rebind.
///

#[derive(Clone)]
pub struct ToMany<T: EntityKind> {
    backlink: &'static Property,
    owner_id: u64,
    store: Option<Store>,
    cache: Option<Vec<T>>,
}

impl<T: EntityKind> ToMany<T> {
    #[must_use]
    pub const fn new(backlink: &'static Property) -> Self {
        Self::with_owner(backlink, 0)
    }

    /// Unbound proxy for a known owner; `bind` or an entity-box attach makes
    /// it resolvable.
    #[must_use]
    pub const fn with_owner(backlink: &'static Property, owner_id: u64) -> Self {
        Self {
            backlink,
            owner_id,
            store: None,
            cache: None,
        }
    }

    #[must_use]
    pub const fn backlink(&self) -> &'static Property {
        self.backlink
    }

    #[must_use]
    pub const fn owner_id(&self) -> u64 {
        self.owner_id
    }

    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.store.is_some()
    }

    /// Cached targets if resolved. Never issues a query.
    #[must_use]
    pub fn peek(&self) -> Option<&[T]> {
        self.cache.as_deref()
    }

    /// Resolve on first call; later calls return the cache until reset.
    pub fn get(&mut self) -> Result<&[T], InternalError> {
        let targets = match self.cache.take() {
            Some(targets) => targets,
            None => self.resolve()?,
        };

        Ok(self.cache.insert(targets).as_slice())
    }

    pub fn len(&mut self) -> Result<usize, InternalError> {
        Ok(self.get()?.len())
    }

    pub fn is_empty(&mut self) -> Result<bool, InternalError> {
        Ok(self.get()?.is_empty())
    }

    fn resolve(&self) -> Result<Vec<T>, InternalError> {
        // An owner that was never put cannot be referenced by any row.
        if self.owner_id == 0 {
            return Ok(Vec::new());
        }

        let store = self
            .store
            .as_ref()
            .ok_or_else(|| InternalError::relation_unbound(T::MODEL.entity_name))?;
        if self.backlink.entity != T::MODEL.entity_name {
            return Err(InternalError::model_invalid(format!(
                "backlink '{}' is not a property of '{}'",
                self.backlink,
                T::MODEL.entity_name
            )));
        }

        let mut builder = store.boxed::<T>()?.query()?;
        builder
            .equal(self.backlink, self.owner_id)?
            .order(T::MODEL.primary_key)?;
        let mut query = builder.build()?;
        let targets = query.find()?;
        query.close()?;

        if store.debug_enabled() {
            tracing::debug!(
                entity = T::MODEL.entity_name,
                backlink = %self.backlink,
                owner_id = self.owner_id,
                rows = targets.len(),
                "resolve to-many"
            );
        }
        store.emit(MetricsEvent::RelationResolve {
            target_name: T::MODEL.entity_name,
            rows: targets.len() as u64,
        });

        Ok(targets)
    }

    /// Drop the cache; the next access re-queries current storage.
    pub fn reset(&mut self) {
        self.cache = None;

        if let Some(store) = &self.store {
            store.emit(MetricsEvent::RelationReset {
                target_name: T::MODEL.entity_name,
            });
        }
    }

    /// Bind to a live store for the given owner and drop any cached state.
    pub fn bind(&mut self, store: &Store, owner_id: u64) {
        self.store = Some(store.clone());
        self.owner_id = owner_id;
        self.cache = None;
    }
}

impl<T: EntityKind + fmt::Debug> fmt::Debug for ToMany<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToMany")
            .field("backlink", &self.backlink)
            .field("owner_id", &self.owner_id)
            .field("bound", &self.store.is_some())
            .field("cache", &self.cache)
            .finish()
    }
}
