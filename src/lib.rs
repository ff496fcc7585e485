//! # Primer Library
//!
//! Warmup and provisioning orchestration for a local Ollama daemon.
//! Provides tool installation, daemon supervision, model provisioning,
//! and cache-warming request drivers.

pub mod api;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod installer;
pub mod logger;
pub mod provision;
pub mod readiness;
pub mod warmup;
