//! Runtime entity metadata: property descriptors and entity models.
//! Produced ahead of time (generated or hand-written) and never mutated.

pub mod entity;
pub mod property;

pub use entity::EntityModel;
pub use property::{Property, PropertyKind};
