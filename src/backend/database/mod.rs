//! Relational storage for application users
//!
//! ```text
//! BackendFactory (postgres/, mysql/, sqlite/)
//!     ↓ QueryContext<DB> = pool + Dialect
//! GenericUserRepository<DB, I, C>
//!     ├── UserStatements (SQL rendered once per table)
//!     └── IdConverter<I> (application id <-> native key)
//! ```

pub mod config;
pub mod connection;
pub mod dialect;
pub mod factory;
pub mod id_converter;
pub mod mysql;
pub mod outcome;
pub mod postgres;
pub mod repository;
pub mod sqlite;
pub mod statements;
pub mod table;

// Re-export key types for convenience
pub use config::DatabaseBackendConfig;
pub use connection::{connect_pool, QueryContext};
pub use dialect::{Dialect, GeneratedKey};
pub use id_converter::{DefaultIdConverter, IdConverter, UuidIdConverter};
pub use outcome::QueryOutcome;
pub use repository::{GenericUserRepository, UserRepository};
pub use statements::UserStatements;
pub use table::{KeyType, UserTable};
