//! Client state shared through Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` is the authentication state machine; `auth` ties it to token
//! storage and the identity check.

pub mod auth;
pub mod session;
