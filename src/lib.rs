//! Procedural object lifecycles for small generative sketches, plus the
//! wgpu renderer and window glue that display them.

pub mod entity;
pub mod error;
pub mod lifecycle;
pub mod renderer;
pub mod scene;
pub mod sketches;
pub mod tween;
pub mod window;

pub use error::{Error, Result};
