//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Symbol map model (SymbolMap)
//! - Error types for the preview pipeline
//! - Rendering functions for different output formats
//! - Source dialect detection
//! - Source file reading
//! - User-facing messages

pub mod error;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
