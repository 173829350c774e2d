//! Utility functions and helpers for bria-proxy.
//!
//! This module provides cross-cutting concerns like structured logging
//! and token redaction.
//!
//! # Submodules
//!
//! - `logging`: Tracing and logging initialization with security filters.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
