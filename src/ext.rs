//! Extension contracts for consumers of token sources.
//!
//! Request decoration lives outside the caching core: callers fetch a [`Token`](crate::auth::Token)
//! from any [`TokenSource`](crate::source::TokenSource) and hand it to a [`RequestSignerExt`]
//! implementation for their HTTP client.

pub mod request_signer;

pub use request_signer::*;
