//! Common utilities for the Tessera geometry engine.
//!
//! This crate provides shared infrastructure used by all Tessera components:
//! - **Warning System** - colored terminal output for contract violations
//!   that are recovered from instead of aborting

pub mod warning;
