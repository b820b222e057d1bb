//! Read models of remote collections.

pub mod envelope;
pub mod query_spec;

pub use self::query_spec::{Filters, QuerySpec};
