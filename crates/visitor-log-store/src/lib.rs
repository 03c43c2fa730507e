#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Visitor Log Store
//!
//! Storage trait, PostgreSQL and in-memory implementations.

pub mod error;
pub mod memory;
pub mod pool;
pub mod postgres;
pub mod schema;
pub mod settings;
pub mod traits;

pub use error::{Error, Result};
pub use memory::MemoryVisitorStore;
pub use pool::connect_lazy;
pub use postgres::PgVisitorStore;
pub use schema::init_schema;
pub use settings::{DATABASE_KEYS, DatabaseSettings, PoolSettings, TlsMode, TlsPolicy};
pub use traits::VisitorStore;
