//! # dirmanifest
//!
//! Facade crate re-exporting [`dirmanifest_core`]. The command-line tool lives
//! in the `dirmanifest-cli` workspace member.

pub use dirmanifest_core::*;
