//! Courier Core
//!
//! Core types shared by the Courier task plugins.
//!
//! This crate contains:
//! - Domain types: the entities each remote API works with (syncs, mail, notifications)
//! - DTOs: wire envelopes for requests and responses

pub mod domain;
pub mod dto;
