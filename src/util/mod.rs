//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from page and component
//! logic: token decoding and storage, status texts, and router wiring.

pub mod auth;
pub mod messages;
pub mod token;
pub mod token_store;
