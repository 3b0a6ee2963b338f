use crate::{
    db::{
        config::StoreConfig,
        engine::{Engine, MemoryEngine},
        query::QueryBuilder,
        record::{RawRow, Record},
    },
    error::InternalError,
    model::Property,
    obs::sink::{self, MetricsEvent, with_metrics_sink},
    traits::EntityKind,
};
use std::{fmt, marker::PhantomData, sync::Arc};

///
/// Store
///
/// Store context: one engine plus per-store policy. Cheap to clone; all
/// clones address the same engine.
///

#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    engine: Arc<dyn Engine>,
    config: StoreConfig,
}

impl Store {
    #[must_use]
    pub fn open(engine: Arc<dyn Engine>, config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(StoreInner { engine, config }),
        }
    }

    /// Store backed by a fresh `MemoryEngine` with default config.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryEngine::new()), StoreConfig::new())
    }

    #[must_use]
    pub fn engine(&self) -> &dyn Engine {
        self.inner.engine.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// True when both handles address the same store context.
    #[must_use]
    pub fn same_store(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Entity-access façade for `E`; registers the entity with the engine.
    pub fn boxed<E: EntityKind>(&self) -> Result<EntityBox<E>, InternalError> {
        self.engine().register_entity(E::MODEL)?;

        Ok(EntityBox {
            store: self.clone(),
            _marker: PhantomData,
        })
    }

    pub(crate) fn emit(&self, event: MetricsEvent) {
        match self.inner.config.metrics {
            Some(metrics) => with_metrics_sink(metrics, || sink::record(event)),
            None => sink::record(event),
        }
    }

    pub(crate) fn debug_enabled(&self) -> bool {
        self.inner.config.debug
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

///
/// EntityBox
///
/// Entity-access façade: persists entities of one type and materializes
/// engine rows into typed instances with bound relations.
///

pub struct EntityBox<E: EntityKind> {
    store: Store,
    _marker: PhantomData<fn() -> E>,
}

impl<E: EntityKind> Clone for EntityBox<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: EntityKind> EntityBox<E> {
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Fully initialized property metadata for `E`.
    pub fn properties(&self) -> Result<&'static [Property], InternalError> {
        E::MODEL.validate()?;

        Ok(E::MODEL.properties)
    }

    /// Start a new condition builder for `E`.
    pub fn query(&self) -> Result<QueryBuilder<E>, InternalError> {
        QueryBuilder::new(self.clone())
    }

    /// Insert or overwrite. Assigns an id when the entity has none and
    /// binds its relations to this store.
    pub fn put(&self, entity: &mut E) -> Result<u64, InternalError> {
        let row = entity.to_record().encode()?;
        let id = self
            .store
            .engine()
            .put(E::MODEL.entity_name, entity.id(), row)?;

        entity.set_id(id);
        entity.bind(&self.store);
        self.store.emit(MetricsEvent::Put {
            entity_name: E::MODEL.entity_name,
        });

        Ok(id)
    }

    pub fn get(&self, id: u64) -> Result<Option<E>, InternalError> {
        self.store
            .engine()
            .get(E::MODEL.entity_name, id)?
            .map(|row| self.materialize(&row))
            .transpose()
    }

    pub fn get_all(&self) -> Result<Vec<E>, InternalError> {
        let rows = self.store.engine().get_all(E::MODEL.entity_name)?;
        self.store.emit(MetricsEvent::Find {
            entity_name: E::MODEL.entity_name,
            rows: rows.len() as u64,
        });

        rows.iter().map(|row| self.materialize(row)).collect()
    }

    pub fn count(&self) -> Result<u64, InternalError> {
        self.store.engine().count_all(E::MODEL.entity_name)
    }

    pub fn remove(&self, id: u64) -> Result<bool, InternalError> {
        let removed = self.store.engine().remove(E::MODEL.entity_name, id)?;
        self.store.emit(MetricsEvent::Remove {
            entity_name: E::MODEL.entity_name,
            rows: u64::from(removed),
        });

        Ok(removed)
    }

    pub fn remove_entity(&self, entity: &E) -> Result<bool, InternalError> {
        self.remove(entity.id())
    }

    /// Bind a detached instance (e.g. one built by hand with a known id) to
    /// this store so its relations resolve against current data.
    pub fn attach(&self, entity: &mut E) {
        entity.bind(&self.store);
    }

    pub(crate) fn materialize(&self, row: &RawRow) -> Result<E, InternalError> {
        let record = Record::decode(row)?;
        let mut entity = E::from_record(&record)?;
        entity.bind(&self.store);

        Ok(entity)
    }
}
