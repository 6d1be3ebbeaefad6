//! Core data types for pomtree.
//!
//! This crate defines the values shared by every other layer: Maven-style
//! coordinates with their exclusion sets, and the resolver configuration
//! (cache root, repositories, resolution mode).
//!
//! This crate is intentionally free of network I/O.

pub mod config;
pub mod coordinate;
