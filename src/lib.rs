pub mod config;
pub mod effects;
pub mod logging;
pub mod render;
pub mod surface;
pub mod timer;

#[cfg(not(target_arch = "wasm32"))]
pub mod app;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;

#[cfg(target_arch = "wasm32")]
pub mod web;
