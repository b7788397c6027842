//! Navigation-boundary access decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! `route` runs before render from token presence, `access` runs after
//! hydration against the identity endpoint, and `role` gates privileged
//! sections by claimed role. All three return decisions; callers navigate.

pub mod access;
pub mod role;
pub mod route;
