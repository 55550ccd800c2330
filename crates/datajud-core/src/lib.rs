//! Core types and trait definitions for the DataJud case reconciler.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the identifier normalizer, the search-document extractor, and the two seams
//! (`CaseResolver`, `CaseStore`) that the query and storage crates implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod extract;
pub mod number;
pub mod record;
pub mod search;
pub mod store;

pub use error::{Error, Result};
pub use number::CaseNumber;
