//! MySQL backend: generated keys come from the insert's `LAST_INSERT_ID()`

mod factory_impl;
pub mod schema;

pub use factory_impl::MySqlFactory;
