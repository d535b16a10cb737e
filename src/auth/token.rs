//! Token records, secret wrappers, and the JSON shape issued by token endpoints.

pub mod record;
pub mod secret;
pub mod wire;
