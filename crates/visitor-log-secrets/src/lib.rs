//! Pluggable secret resolution.
//!
//! Provides:
//! - [`SecretProvider`]: async trait resolving a set of parameter names
//! - [`SecretMap`]: resolved values keyed by short key (last path segment)
//! - [`EnvSecretProvider`]: reads the process environment
//! - [`StaticSecretProvider`]: fixed in-memory values
//! - `SsmSecretProvider`: AWS SSM Parameter Store (feature `aws-ssm`)
//!
//! Resolution is all-or-nothing: if any requested name is absent the whole
//! call fails with [`Error::Missing`] listing every absent name.

#![forbid(unsafe_code)]

mod batch;
mod env;
mod error;
mod map;
mod provider;
#[cfg(feature = "aws-ssm")]
mod ssm;
mod static_provider;

pub use env::EnvSecretProvider;
pub use error::{Error, Result};
pub use map::{SecretMap, short_key};
pub use provider::SecretProvider;
#[cfg(feature = "aws-ssm")]
pub use ssm::SsmSecretProvider;
pub use static_provider::StaticSecretProvider;
