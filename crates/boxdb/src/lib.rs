//! ## Crate layout
//! - `core`: property metadata, condition builder, compiled queries, relation
//!   proxies, the engine contract and the in-memory engine.
//! - `error`: public error taxonomy mapped from core errors.
//!
//! The `prelude` module carries everything needed to declare an entity and
//! query it.

pub use boxdb_core as core;

pub mod error;

pub use boxdb_core::{db, model, obs, value};
pub use error::{Error, ErrorKind, ErrorOrigin, QueryErrorKind};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        core::{
            db::{
                EntityBox, MemoryEngine, OrderFlags, Peek, Query, QueryBuilder, Store, StoreConfig,
                ToMany, ToOne, record::Record,
            },
            model::{EntityModel, Property, PropertyKind},
            traits::EntityKind,
            value::Value,
        },
    };
}
