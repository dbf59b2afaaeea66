//! Shared test utilities for the preset workspace.
//!
//! This crate provides on-disk fixtures for loader and CLI tests. It is a
//! dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`workspace`]: [`TestWorkspace`] builder for config, preset and package files

pub mod workspace;

pub use workspace::TestWorkspace;
