use slotmap::{new_key_type, SlotMap};

use crate::{
    entity::{Transform, Visual},
    error::{Error, Result},
    scene::SceneRenderer,
};

new_key_type! {
    pub struct DrawableHandle;
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Drawable {
    pub visual: Visual,
    pub transform: Transform,
}

/// CPU-side drawable store. The GPU renderer uploads its contents as instances
/// each frame, so `capacity` matches the size of the instance buffer.
#[derive(Debug)]
pub struct DrawList {
    drawables: SlotMap<DrawableHandle, Drawable>,
    capacity: usize,
}

impl DrawList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            drawables: SlotMap::with_capacity_and_key(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn get(&self, handle: DrawableHandle) -> Option<&Drawable> {
        self.drawables.get(handle)
    }

    pub fn contains(&self, handle: DrawableHandle) -> bool {
        self.drawables.contains_key(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables.values()
    }
}

impl SceneRenderer for DrawList {
    type Handle = DrawableHandle;

    fn register_drawable(&mut self, visual: &Visual) -> Result<DrawableHandle> {
        if self.drawables.len() >= self.capacity {
            return Err(Error::renderer_unavailable(format!(
                "draw list is full ({} drawables)",
                self.capacity
            )));
        }
        Ok(self.drawables.insert(Drawable {
            visual: *visual,
            transform: Transform::default(),
        }))
    }

    fn unregister_drawable(&mut self, handle: DrawableHandle) -> Result<()> {
        self.drawables
            .remove(handle)
            .map(|_| ())
            .ok_or_else(|| Error::renderer_unavailable(format!("unknown drawable {:?}", handle)))
    }

    fn set_transform(&mut self, handle: DrawableHandle, transform: &Transform) -> Result<()> {
        let drawable = self
            .drawables
            .get_mut(handle)
            .ok_or_else(|| Error::renderer_unavailable(format!("unknown drawable {:?}", handle)))?;
        drawable.transform = *transform;
        Ok(())
    }
}
