//! PostgreSQL backend: `RETURNING` for generated keys, `$n` placeholders

mod factory_impl;
pub mod schema;

pub use factory_impl::PostgresFactory;
