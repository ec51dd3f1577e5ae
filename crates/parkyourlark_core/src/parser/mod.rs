//! Request decoding for admin use cases.
//!
//! # Responsibility
//! - Turn opaque request payloads into typed commands.
//! - Report malformed input as a typed error instead of panicking.

pub mod request_parser;
