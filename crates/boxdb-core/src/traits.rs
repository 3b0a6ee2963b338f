use crate::{db::Store, db::record::Record, error::InternalError, model::EntityModel};

///
/// EntityKind
///
/// Contract between an entity type and the store. Implementations are
/// normally generated alongside the entity's property metadata.
///

pub trait EntityKind: Sized {
    const MODEL: &'static EntityModel;

    /// Primary key; 0 while the entity has never been put.
    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    fn to_record(&self) -> Record;

    fn from_record(record: &Record) -> Result<Self, InternalError>;

    /// Bind relation proxies to a live store. Called after every put, get
    /// and attach; implementations must drop any cached relation state.
    fn bind(&mut self, _store: &Store) {}
}
