//! Flows module - End-to-end commands
//!
//! Provides:
//! - preview: active file to rendered gallery, and raw map extraction

pub mod preview;
