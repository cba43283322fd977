//! SQLite backend, also used for in-memory development and tests

mod factory_impl;
pub mod schema;

pub use factory_impl::SqliteFactory;
