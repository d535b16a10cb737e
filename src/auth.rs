//! Credential model: tokens, redacted secrets, and token-endpoint wire parsing.

pub mod token;

pub use token::{record::*, secret::*, wire::*};
