//! cURL command generation for debugging.
//!
//! When a request is executed with debugging enabled, the outgoing request is
//! rendered as a cURL command so it can be replayed from a shell.

pub mod generator;

pub use generator::generate_curl_command;
