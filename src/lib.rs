//! roomreel: host side of the room gallery.
//!
//! The carousel itself (geometry, gestures, focus, collection, publishing)
//! lives in the `carousel` crate and does no I/O. This crate supplies what it
//! leaves to the host: configuration, the image provider, debounced
//! provisioning with its placeholder fallback, and a terminal driver.

pub mod config;
pub mod provider;
pub mod repl;
pub mod services;
