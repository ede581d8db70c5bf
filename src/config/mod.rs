//! Configuration for the catalog kernel
//!
//! Mirrors the teacher crate's builder-based configuration style: plain
//! `Clone + Debug` structs, a marker `Config` trait, and optional `serde`
//! support behind the `config-files` feature.

mod kernel_config;
mod paradigm;

pub use kernel_config::KernelConfig;
pub use paradigm::{Paradigm, TieBreakPolicy};

/// Marker trait for all configuration types in the kernel.
pub trait Config: Send + Sync {}
