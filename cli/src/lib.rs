// SPDX-License-Identifier: MIT OR Apache-2.0

//! lulugo CLI - headless local match for testing the rule engine
//!
//! The binary wires these pieces to stdin/stdout; they are exposed as a library so the
//! integration tests can drive them directly.

pub mod command;
pub mod config;
pub mod render;
pub mod store;
