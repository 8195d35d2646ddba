//! Carousel navigation and transform engine for the room gallery.
//!
//! This crate owns the gallery's state: the ordered room collection, the
//! focus index, the browsing/viewing mode, and the live drag gesture. Every
//! state change is projected into one [`geometry::Transform`] per room and
//! published as a [`publish::Snapshot`]. The host (a renderer, or the
//! `roomreel` command loop) is responsible only for feeding commands in and
//! painting the snapshots that come out. Nothing here touches the network,
//! the clipboard, or a clock.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Command surface, [`engine::EngineCore`] |
//! | [`rooms`] | Room records and the ordered collection store |
//! | [`focus`] | Focus index, view mode, and mutation rebasing |
//! | [`input`] | Drag state and the per-gesture commit machine |
//! | [`geometry`] | Pure per-room transform projection |
//! | [`publish`] | Id-keyed transform cache, exit transitions, snapshots |
//! | [`fallback`] | Demo rooms and the deterministic placeholder sequence |
//! | [`consts`] | Shared numeric constants (scales, radii, thresholds) |

pub mod consts;
pub mod engine;
pub mod fallback;
pub mod focus;
pub mod geometry;
pub mod input;
pub mod publish;
pub mod rooms;
