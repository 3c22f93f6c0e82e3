//! Sandbox containment and file operations
//!
//! This module provides:
//! - Containment checks against the sandbox root
//! - Glob expansion of delete patterns
//! - Full-content file writes

mod containment;
mod matcher;
mod writer;

pub use containment::Sandbox;
pub use matcher::PatternMatcher;
pub use writer::FileWriter;
