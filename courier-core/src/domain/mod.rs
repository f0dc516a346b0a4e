//! Core domain types
//!
//! These types represent what the task plugins exchange with remote APIs and
//! hand back to the workflow as output. They are shared between the HTTP
//! clients (decoding) and the tasks (policy).

pub mod mail;
pub mod notify;
pub mod sync;
