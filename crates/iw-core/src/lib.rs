//! Core types and trait definitions for the iw revision-tree editor.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the edit-block parser, the patch applier, the revision data model, and the
//! orchestrator that ties a completion service to a revision store.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod blocks;
pub mod completion;
pub mod edit;
pub mod error;
pub mod memory;
pub mod patch;
pub mod prompt;
pub mod revision;
pub mod store;

pub use error::{Error, Result};
