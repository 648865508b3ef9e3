//! Shared foundational types used across the Quire documentation toolchain.
//!
//! This crate provides the source locations carried by location-aware
//! diagnostics.

#![warn(missing_docs)]

pub mod location;

pub use location::SourceLocation;
