//! Core type definitions for Filegate
//!
//! This module contains the shared types used across the gateway: the
//! request/outcome shapes exchanged with the protocol layer and the
//! process-level configuration types.

mod config_types;
mod op_types;

pub use config_types::*;
pub use op_types::*;
