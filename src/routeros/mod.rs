//! RouterOS API client module
//!
//! Client side of the MikroTik RouterOS binary API: wire protocol,
//! authentication, and the pooled session layer on top. The router itself
//! is an external collaborator; nothing here interprets hotspot
//! semantics.

mod connection;
mod pool;

pub use connection::{RouterError, RouterOsConnection, Sentence, encode_length, read_length};
pub use pool::{ConnectionPool, PoolError, PoolStats, PooledConnection};
