//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and reads shared state from
//! context provided by `app`.

pub mod home;
pub mod login;
pub mod users;
