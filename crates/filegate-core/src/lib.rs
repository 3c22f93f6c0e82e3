//! Filegate Core Library
//!
//! This crate provides the core functionality for Filegate, including:
//! - Sandbox containment for every path-taking operation
//! - Glob-based selection and batched deletion of files
//! - Two-tier removal via an external version-control tool with fallback
//! - Full-content file writes
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     filegate-core                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  gateway.rs    - Batch delete and edit entry points         │
//! │  removal/      - External tool invocation, config artifacts │
//! │  sandbox/      - Containment, glob matching, file writes    │
//! │  types/        - Shared type definitions                    │
//! │  error.rs      - Error types                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod gateway;
pub mod removal;
pub mod sandbox;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;

pub use gateway::Gateway;

// Re-export removal components
pub use removal::{CredentialSource, RemovalInvoker, RemovalReport, RemovalTier, ToolConfigGuard};

// Re-export sandbox components
pub use sandbox::{FileWriter, PatternMatcher, Sandbox};
