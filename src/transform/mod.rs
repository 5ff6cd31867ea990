//! Built-in transform implementations
//!
//! Each transform is a pure function of (input dataset, construction
//! params), registered under its configuration name in
//! [`Registry::builtin`](crate::registry::Registry::builtin).

mod case;
mod dedupe;
mod field_dropper;
mod fill;
mod filter;
mod group;
mod head;
mod multiply;
mod normalize;
mod rename;

pub use case::{Lowercase, Uppercase};
pub use dedupe::Dedupe;
pub use field_dropper::FieldDropper;
pub use fill::FillMissing;
pub use filter::{FilterOp, FilterRows};
pub use group::{AggFunc, GroupBy};
pub use head::Head;
pub use multiply::Multiply;
pub use normalize::Normalize;
pub use rename::RenameField;
