//! Condition builder and compiled query.
//!
//! A `QueryBuilder` owns one engine-side builder resource from creation until
//! `build` or `close`; a `Query` owns one compiled query resource until
//! `close` or drop.

mod builder;
mod compiled;
mod condition;
mod order;


pub use builder::QueryBuilder;
pub use compiled::Query;
pub use condition::{Condition, ConditionOp, Operand};
pub use order::{OrderDirective, OrderFlags};
