//! The demo sketches. Each one owns its lifecycle managers and nothing else;
//! drawables live in whatever `SceneRenderer` the caller hands in.

use crate::{
    error::Result,
    lifecycle::LifecycleManager,
    scene::{SceneRenderer, Sketch},
};

mod countdown;
mod fleet;
pub mod palette;
mod rings;
mod room;
mod spinners;

pub use countdown::Countdown;
pub use fleet::Fleet;
pub use rings::Rings;
pub use room::Room;
pub use spinners::Spinners;

/// Every sketch, in keyboard order.
pub fn all<R>(seed: u64) -> Vec<Box<dyn Sketch<R>>>
where
    R: SceneRenderer + 'static,
    R::Handle: 'static,
{
    vec![
        Box::new(Rings::<R::Handle>::new(seed)),
        Box::new(Spinners::<R::Handle>::new(seed)),
        Box::new(Countdown::<R::Handle>::new(seed)),
        Box::new(Fleet::<R::Handle>::new(seed)),
        Box::new(Room::<R::Handle>::new(seed)),
    ]
}

/// Tears down every manager even if one fails, returning the first error.
pub(crate) fn teardown_all<R: SceneRenderer>(
    renderer: &mut R,
    managers: &mut [&mut LifecycleManager<R::Handle>],
) -> Result<()> {
    let mut first_error = None;
    for manager in managers.iter_mut() {
        if let Err(err) = manager.teardown(renderer) {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scene::{DrawList, Frame};

    pub(crate) fn run_frames<S>(sketch: &mut S, list: &mut DrawList, start: u32, count: u32)
    where
        S: Sketch<DrawList> + ?Sized,
    {
        for i in start..start + count {
            let frame = Frame {
                time: i as f32 / 60.,
                delta: 1. / 60.,
            };
            sketch.on_frame(list, frame).unwrap();
        }
    }

    #[test]
    fn every_sketch_loads_runs_and_unloads_cleanly() {
        let mut list = DrawList::with_capacity(8192);
        for mut sketch in all::<DrawList>(11) {
            sketch.on_load(&mut list).unwrap();
            assert!(!list.is_empty(), "{} drew nothing", sketch.name());

            run_frames(sketch.as_mut(), &mut list, 0, 600);

            sketch.on_unload(&mut list).unwrap();
            assert!(list.is_empty(), "{} leaked drawables", sketch.name());
            sketch.on_unload(&mut list).unwrap();
        }
    }

    #[test]
    fn sketches_can_be_reloaded() {
        let mut list = DrawList::with_capacity(8192);
        for mut sketch in all::<DrawList>(5) {
            sketch.on_load(&mut list).unwrap();
            run_frames(sketch.as_mut(), &mut list, 0, 600);
            sketch.on_unload(&mut list).unwrap();
            assert!(list.is_empty(), "{} leaked drawables", sketch.name());

            sketch.on_load(&mut list).unwrap();
            run_frames(sketch.as_mut(), &mut list, 0, 60);
            sketch.on_unload(&mut list).unwrap();
            assert!(list.is_empty());
        }
    }

    #[test]
    fn sketch_names_are_unique() {
        let sketches = all::<DrawList>(0);
        let mut names: Vec<_> = sketches.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), sketches.len());
    }
}
