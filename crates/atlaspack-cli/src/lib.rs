//! Atlaspack CLI library.
//!
//! This crate provides the functionality behind the `atlaspack` binary:
//! loading sprite PNGs from a directory, dicing and packing them, and
//! writing atlas images plus a JSON manifest.

pub mod commands;
pub mod input;
pub mod logging;
