//! Deterministic stand-ins for a paratime node and for the system random source.
//!
//! [`NullConnection`] checks every submitted transaction against its chain context
//! before accepting it, keeps the submissions, executed calls and gas queries for
//! later assertions, and answers with results queued by the test. Given a call data
//! key pair it opens encrypted calls and seals results back to the caller.
//! [`NullRandom`] yields a repeatable byte stream so ephemeral keys and nonces can be
//! pinned in tests.

pub mod connection;
pub mod random;

pub use connection::NullConnection;
pub use random::NullRandom;
