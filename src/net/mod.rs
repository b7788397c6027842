//! Networking modules for the records API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` is the single gateway every call goes through, `transport` is the
//! HTTP seam beneath it, `services` wraps individual endpoints, `error`
//! classifies failures, and `types` defines the shared wire schema.

pub mod api;
pub mod error;
pub mod services;
pub mod transport;
pub mod types;
