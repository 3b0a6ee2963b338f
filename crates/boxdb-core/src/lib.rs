//! Core runtime for boxdb: property metadata, the condition builder and
//! compiled query, lazy relation proxies, and the storage-engine contract
//! they run against.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod error;
pub mod model;
pub mod obs;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary needed to declare entities and
/// build queries. Engines, records and observability stay one level down.
///

pub mod prelude {
    pub use crate::{
        db::{EntityBox, OrderFlags, Peek, Query, QueryBuilder, Store, ToMany, ToOne},
        model::{EntityModel, Property, PropertyKind},
        traits::EntityKind,
        value::Value,
    };
}
