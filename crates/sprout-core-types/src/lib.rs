//! Core types shared across Sprout facilities
//!
//! This crate provides the canonical schema constants used by the logging
//! macros and the error facility, so every crate emits the same field keys
//! and event names.

pub mod schema;
