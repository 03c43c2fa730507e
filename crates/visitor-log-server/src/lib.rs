#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

//! Visitor Log Server
//!
//! Ordered startup, route table, and outbound connectivity check.

pub mod bootstrap;
pub mod config;
pub mod cors;
pub mod echo;
pub mod error;
pub mod routes;

pub use bootstrap::{App, StartupStage, bootstrap, launch, secret_provider};
pub use config::{Args, SecretSource, ServerConfig};
pub use echo::{HttpIpEcho, IpEcho};
pub use error::{Error, Result};
pub use routes::AppState;
