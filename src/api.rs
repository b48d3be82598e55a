//! Wire-level API clients.

pub mod anthropic;
