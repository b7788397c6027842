//! # folkers-client
//!
//! Leptos + WASM client for the Folkers records API.
//!
//! This crate owns the browser session: token decoding and storage, the
//! authentication state machine, the single API gateway that injects the
//! bearer token and classifies responses, and the route, access and role
//! guards applied at navigation boundaries.

pub mod app;
pub mod config;
pub mod guards;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

/// WASM entry point: install browser logging and hydrate the server render.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
