#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Visitor Log Core
//!
//! Domain types and the shared error type.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{MAX_NAME_LEN, Visitor, VisitorName, VisitorSummary};
