//! "3, 2, 1" built from blocks, each digit swooping in from below, holding,
//! then flying off over the camera. The whole countdown repeats every 6 s.

use std::f32::consts::PI;

use glam::{vec3, Vec3};
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::{
    entity::{hex_color, Camera, Transform, Visual},
    error::Result,
    lifecycle::{Expiry, Factory, LifecycleManager, Motion, ObjectSpec, OnExpire, SpawnTimer},
    scene::{Frame, SceneRenderer, Sketch},
    sketches::teardown_all,
    tween::{Easing, Tween, TweenTrack},
};

const CYCLE: f32 = 6.;
const STAGGER: f32 = 1.;
const TRANSITION: f32 = 1.5;
const CELL: f32 = 4.;
const DEPTH: f32 = 10.;

const GLYPHS: [[&str; 5]; 3] = [
    ["###", "..#", "###", "..#", "###"],
    ["###", "..#", "###", "#..", "###"],
    [".#.", "##.", ".#.", ".#.", "###"],
];

fn glyph_cells(rows: &[&str; 5]) -> Vec<Vec3> {
    rows.iter()
        .enumerate()
        .flat_map(|(r, row)| {
            row.chars()
                .enumerate()
                .filter(|&(_, c)| c == '#')
                .map(move |(c, _)| vec3((c as f32 - 1.) * CELL, (2. - r as f32) * CELL, 0.))
        })
        .collect()
}

fn random_turn(rng: &mut dyn RngCore) -> f32 {
    let pi = rng.gen::<f32>() * -PI + PI;
    pi * rng.gen::<f32>() * 3.
}

/// Enter from below after `delay`, then leave over the top.
fn digit_track(delay: f32, turn: Vec3) -> TweenTrack {
    let below = vec3(0., -100., 100.);
    let above = vec3(0., 100., -100.);
    TweenTrack::new()
        .then_move(
            Tween::new(below, Vec3::ZERO, TRANSITION)
                .delay(delay)
                .easing(Easing::QuadraticOut),
        )
        .then_move(Tween::new(Vec3::ZERO, above, TRANSITION).easing(Easing::QuadraticIn))
        .then_rotate(
            Tween::new(turn, Vec3::ZERO, TRANSITION)
                .delay(delay)
                .easing(Easing::QuadraticOut),
        )
        .then_rotate(Tween::new(Vec3::ZERO, -turn, TRANSITION).easing(Easing::QuadraticIn))
}

struct DigitFactory {
    cells: Vec<Vec3>,
    track: TweenTrack,
}

impl Factory for DigitFactory {
    fn build(&mut self, _rng: &mut dyn RngCore, _time: f32) -> Result<ObjectSpec> {
        let offset = self.cells.pop().unwrap_or(Vec3::ZERO);
        let motion = Motion::Tween {
            track: self.track.clone(),
            offset,
        };
        let mut transform = Transform {
            scale: vec3(CELL, CELL, DEPTH),
            ..Default::default()
        };
        motion.apply(&mut transform, 0., 0.);

        Ok(ObjectSpec {
            transform,
            motion,
            expiry: Expiry::MaxAge(self.track.total_duration()),
            visual: Visual::from_hex(0xffffff),
        })
    }
}

pub struct Countdown<H> {
    digits: LifecycleManager<H>,
    props: LifecycleManager<H>,
    digit_factory: DigitFactory,
    timer: SpawnTimer,
    rng: Pcg64Mcg,
}

impl<H: Copy + Eq + std::fmt::Debug> Countdown<H> {
    pub fn new(seed: u64) -> Self {
        Self {
            digits: LifecycleManager::seeded(OnExpire::Drop, seed.wrapping_add(1)),
            props: LifecycleManager::seeded(OnExpire::Drop, seed.wrapping_add(2)),
            digit_factory: DigitFactory {
                cells: Vec::new(),
                track: TweenTrack::new(),
            },
            timer: SpawnTimer::new(),
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    fn launch<R>(&mut self, renderer: &mut R) -> Result<()>
    where
        R: SceneRenderer<Handle = H>,
    {
        for (i, glyph) in GLYPHS.iter().enumerate() {
            let turn = vec3(
                random_turn(&mut self.rng),
                random_turn(&mut self.rng),
                random_turn(&mut self.rng),
            );
            self.digit_factory.track = digit_track(STAGGER * i as f32, turn);
            self.digit_factory.cells = glyph_cells(glyph);
            let count = self.digit_factory.cells.len();
            self.digits.spawn(renderer, &mut self.digit_factory, count)?;
        }
        Ok(())
    }
}

impl<R: SceneRenderer> Sketch<R> for Countdown<R::Handle> {
    fn name(&self) -> &'static str {
        "countdown"
    }

    fn camera(&self) -> Camera {
        Camera {
            position: vec3(0., 0., 100.),
            target: Vec3::ZERO,
            fov: 60.,
            near: 1.,
            far: 1000.,
            ..Default::default()
        }
    }

    fn background(&self) -> Vec3 {
        hex_color(0x333333)
    }

    fn on_load(&mut self, renderer: &mut R) -> Result<()> {
        let mut cube = |_: &mut dyn RngCore, _: f32| -> Result<ObjectSpec> {
            Ok(ObjectSpec {
                visual: Visual::from_hex(0x00ff00),
                ..Default::default()
            })
        };
        self.props.spawn(renderer, &mut cube, 1)?;
        self.timer.reset();
        self.launch(renderer)
    }

    fn on_frame(&mut self, renderer: &mut R, frame: Frame) -> Result<()> {
        self.digits
            .advance(renderer, &mut self.digit_factory, frame)?;
        if self.timer.tick(frame.delta, CYCLE)? {
            self.launch(renderer)?;
        }
        Ok(())
    }

    fn on_unload(&mut self, renderer: &mut R) -> Result<()> {
        teardown_all(renderer, &mut [&mut self.digits, &mut self.props])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        scene::{DrawList, DrawableHandle},
        sketches::tests::run_frames,
    };

    #[test]
    fn glyphs_have_expected_block_counts() {
        let counts: Vec<_> = GLYPHS.iter().map(|g| glyph_cells(g).len()).collect();
        assert_eq!(counts, vec![11, 11, 8]);
    }

    #[test]
    fn digit_lands_on_its_cell_before_leaving() {
        let track = digit_track(0., vec3(1., 2., 3.));
        let motion = Motion::Tween {
            track,
            offset: vec3(4., 8., 0.),
        };
        let mut transform = Transform::default();
        motion.apply(&mut transform, 0., TRANSITION);
        assert_eq!(transform.position, vec3(4., 8., 0.));
        assert_eq!(transform.rotation, Vec3::ZERO);
    }

    #[test]
    fn countdown_expires_then_repeats() {
        let mut list = DrawList::with_capacity(256);
        let mut sketch: Countdown<DrawableHandle> = Countdown::new(4);
        sketch.on_load(&mut list).unwrap();
        assert_eq!(sketch.digits.len(), 30);

        run_frames(&mut sketch, &mut list, 0, 330);
        assert!(sketch.digits.is_empty());
        assert_eq!(list.len(), 1);

        run_frames(&mut sketch, &mut list, 330, 40);
        assert_eq!(sketch.digits.len(), 30);
    }

    #[test]
    fn reloaded_countdown_expires_on_schedule() {
        let mut list = DrawList::with_capacity(256);
        let mut sketch: Countdown<DrawableHandle> = Countdown::new(9);
        sketch.on_load(&mut list).unwrap();
        run_frames(&mut sketch, &mut list, 0, 1200);
        sketch.on_unload(&mut list).unwrap();

        sketch.on_load(&mut list).unwrap();
        for object in sketch.digits.live() {
            assert_eq!(object.spawn_time(), 0.);
        }
        run_frames(&mut sketch, &mut list, 0, 330);
        assert!(sketch.digits.is_empty());
        assert_eq!(list.len(), 1);
    }
}
