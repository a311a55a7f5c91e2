//! The boundary between sketches and whatever draws them.

use glam::Vec3;

use crate::{
    entity::{Camera, Transform, Visual},
    error::Result,
};

mod draw_list;

pub use draw_list::{DrawList, Drawable, DrawableHandle};

/// Creates, moves and releases drawables on behalf of a sketch.
pub trait SceneRenderer {
    type Handle: Copy + Eq + std::fmt::Debug;

    fn register_drawable(&mut self, visual: &Visual) -> Result<Self::Handle>;

    /// Removes the drawable and releases its resources. Handles are never
    /// valid after this returns `Ok`.
    fn unregister_drawable(&mut self, handle: Self::Handle) -> Result<()>;

    fn set_transform(&mut self, handle: Self::Handle, transform: &Transform) -> Result<()>;
}

/// Clock values handed to a sketch once per display refresh, in seconds.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Frame {
    pub time: f32,
    pub delta: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub pixel_ratio: f64,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// A self-contained animation driven by the render loop.
pub trait Sketch<R: SceneRenderer> {
    fn name(&self) -> &'static str;

    fn camera(&self) -> Camera;

    fn background(&self) -> Vec3;

    /// Builds the initial scene. Called again after `on_unload` when the
    /// sketch is re-entered.
    fn on_load(&mut self, renderer: &mut R) -> Result<()>;

    fn on_frame(&mut self, renderer: &mut R, frame: Frame) -> Result<()>;

    fn on_resize(&mut self, _viewport: Viewport) {}

    /// Releases every drawable the sketch registered. Safe to call twice.
    fn on_unload(&mut self, renderer: &mut R) -> Result<()>;
}
