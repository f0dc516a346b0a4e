//! Data Transfer Objects for remote API communication
//!
//! Envelopes that only exist on the wire. Clients unwrap them into domain
//! types before returning.

pub mod sync;
