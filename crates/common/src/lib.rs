//! Shared types and utilities for bucket-unzip.
//!
//! This crate provides common functionality used across all bucket-unzip crates:
//! - Lexical path normalization and containment checks
//! - POSIX object-key conversion
//! - Shared scratch-layout constants

pub mod constants;
pub mod path_utils;

// Re-export commonly used items at crate root
pub use constants::*;
pub use path_utils::{is_within_root, lexical_normalize, to_posix_path};
