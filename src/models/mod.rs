//! Data models for request descriptors and execution results.
//!
//! This module contains the core data structures used throughout the crate
//! for describing a request and carrying the outcome of executing it.

pub mod request;
pub mod response;

pub use request::{HttpMethod, Requester};
pub use response::{Executed, JsonObject};
