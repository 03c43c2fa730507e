//! Core types for the visitor log.

mod proptests;
mod visitor;

pub use visitor::{MAX_NAME_LEN, Visitor, VisitorName, VisitorSummary};
