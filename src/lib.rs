//! Library exports for captionboard.
//!
//! An [`session::Editor`] drives one annotation session at a time: it places a
//! remote (or local) photo as a fixed background, lets callers add text and
//! shape layers on top, records every layer in order, and flattens the result
//! into a PNG or JPEG. Rendering goes through the [`engine::GraphicsEngine`]
//! trait; [`engine::CairoEngine`] is the bundled implementation.

pub mod config;
pub mod draw;
pub mod engine;
pub mod export;
pub mod layers;
pub mod session;
pub mod util;

pub use config::Config;
