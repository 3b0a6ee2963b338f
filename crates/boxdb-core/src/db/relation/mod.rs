//! Lazy relation proxies.
//!
//! A proxy is bound to a store when its owning entity is put, loaded or
//! attached. Resolution only reads; it never touches the owner's own row.

mod to_many;
mod to_one;

#[cfg(test)]
mod tests;

pub use to_many::ToMany;
pub use to_one::{Peek, ToOne};
