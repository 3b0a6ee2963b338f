//! Storage-engine contract.
//!
//! The engine owns persistence, condition evaluation and sorting. boxdb-core
//! only issues these calls and consumes their results; builder and query
//! resources live engine-side and are addressed by opaque handles.

mod eval;
mod memory;

pub use memory::MemoryEngine;

use crate::{
    db::{
        query::{Condition, OrderDirective},
        record::RawRow,
    },
    error::InternalError,
    model::EntityModel,
};
use std::{fmt, num::NonZeroU64};

///
/// BuilderHandle
/// Token for one engine-side builder resource. Never zero.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BuilderHandle(NonZeroU64);

///
/// QueryHandle
/// Token for one engine-side compiled query. Never zero.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct QueryHandle(NonZeroU64);

macro_rules! impl_handle {
    ($name:ident) => {
        impl $name {
            #[must_use]
            pub const fn new(raw: NonZeroU64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn get(self) -> u64 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

impl_handle!(BuilderHandle);
impl_handle!(QueryHandle);

///
/// Engine
///
/// Primitives consumed from the storage engine. Calls are synchronous and may
/// block. Errors raised here propagate to callers unchanged.
///

pub trait Engine: Send + Sync {
    /// Make an entity known to the engine. Idempotent for the same model.
    fn register_entity(&self, model: &'static EntityModel) -> Result<(), InternalError>;

    // ---------------------------------------------------------------------
    // Builder resources
    // ---------------------------------------------------------------------

    fn create_builder(&self, entity_name: &str) -> Result<BuilderHandle, InternalError>;

    /// Release a builder resource. Releasing an unknown handle is an error.
    fn destroy_builder(&self, handle: BuilderHandle) -> Result<(), InternalError>;

    fn append_condition(
        &self,
        handle: BuilderHandle,
        condition: Condition,
    ) -> Result<(), InternalError>;

    fn append_order(&self, handle: BuilderHandle, order: OrderDirective)
    -> Result<(), InternalError>;

    /// Compile the accumulated state into a new, independent query resource.
    /// The builder resource stays live; the caller releases it.
    fn build_query(&self, handle: BuilderHandle) -> Result<QueryHandle, InternalError>;

    // ---------------------------------------------------------------------
    // Query resources
    // ---------------------------------------------------------------------

    fn destroy_query(&self, handle: QueryHandle) -> Result<(), InternalError>;

    /// All matching rows, honouring the compiled order directives.
    fn find(&self, handle: QueryHandle) -> Result<Vec<RawRow>, InternalError>;

    /// First matching row in compiled order.
    fn find_first(&self, handle: QueryHandle) -> Result<Option<RawRow>, InternalError>;

    /// The only matching row; a conflict error when more than one matches.
    fn find_unique(&self, handle: QueryHandle) -> Result<Option<RawRow>, InternalError>;

    /// Primary keys of matching rows, in compiled order.
    fn find_ids(&self, handle: QueryHandle) -> Result<Vec<u64>, InternalError>;

    fn count(&self, handle: QueryHandle) -> Result<u64, InternalError>;

    /// Delete every matching row, returning how many were removed.
    fn remove_matching(&self, handle: QueryHandle) -> Result<u64, InternalError>;

    /// Human-readable rendering of the compiled query.
    fn describe(&self, handle: QueryHandle) -> Result<String, InternalError>;

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    /// Store a row; an id of 0 asks the engine to assign one. Returns the id.
    fn put(&self, entity_name: &str, id: u64, row: RawRow) -> Result<u64, InternalError>;

    fn get(&self, entity_name: &str, id: u64) -> Result<Option<RawRow>, InternalError>;

    /// All rows of an entity in primary-key order.
    fn get_all(&self, entity_name: &str) -> Result<Vec<RawRow>, InternalError>;

    fn remove(&self, entity_name: &str, id: u64) -> Result<bool, InternalError>;

    fn count_all(&self, entity_name: &str) -> Result<u64, InternalError>;
}
