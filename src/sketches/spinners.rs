//! Two wheels on quarter-circle trails spinning about the origin, watched by
//! a frozen spray of shards.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{vec3, Vec3};
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::{
    entity::{hex_color, Camera, Transform, Visual},
    error::Result,
    lifecycle::{Expiry, Factory, LifecycleManager, Motion, ObjectSpec, OnExpire},
    scene::{Frame, SceneRenderer, Sketch},
    sketches::{
        palette::{pick_color, pick_palette},
        teardown_all,
    },
};

const SPINNER_COUNT: usize = 2;
const WHEEL_RADIUS: f32 = 45.;
const TRAIL_SEGMENTS: usize = 8;
const MAX_SHARDS: usize = 300;

#[derive(Debug, Copy, Clone)]
enum Part {
    Wheel,
    Trail(usize),
}

/// Lays out one spinner as a rigid group: the wheel and its trail segments
/// all share the group's starting orientation and spin.
struct SpinnerFactory {
    orientation: Vec3,
    parts: Vec<Part>,
}

const SPIN: [f32; 3] = [-0.01, -0.02, -0.15];

impl SpinnerFactory {
    fn arm(angle: f32) -> Vec3 {
        vec3(WHEEL_RADIUS * angle.cos(), WHEEL_RADIUS * angle.sin(), 0.)
    }
}

impl Factory for SpinnerFactory {
    fn build(&mut self, _rng: &mut dyn RngCore, _time: f32) -> Result<ObjectSpec> {
        let part = self.parts.pop().unwrap_or(Part::Wheel);
        let (offset, scale, color) = match part {
            Part::Wheel => (Self::arm(0.), vec3(10., 10., 0.5), 0xffb300),
            Part::Trail(i) => {
                let angle = FRAC_PI_2 * (i as f32 + 0.5) / TRAIL_SEGMENTS as f32;
                (Self::arm(angle), vec3(5., 5., 0.2), 0x4a6d8c)
            }
        };

        let spin = Vec3::from(SPIN);
        let motion = Motion::Orbit {
            pivot: Vec3::ZERO,
            offset,
            spin,
        };
        let mut transform = Transform {
            rotation: self.orientation - spin,
            scale,
            ..Default::default()
        };
        // Settle the part into place before its first frame.
        motion.apply(&mut transform, 0., 0.);

        Ok(ObjectSpec {
            transform,
            motion,
            expiry: Expiry::Never,
            visual: Visual::from_hex(color),
        })
    }
}

struct SprayFactory {
    color: Vec3,
}

impl Factory for SprayFactory {
    fn build(&mut self, rng: &mut dyn RngCore, _time: f32) -> Result<ObjectSpec> {
        let direction = vec3(
            250. + rng.gen::<f32>() - 500.,
            rng.gen::<f32>() - 500.,
            rng.gen::<f32>() - 500.,
        )
        .normalize();
        Ok(ObjectSpec {
            transform: Transform {
                position: direction * (10. + rng.gen::<f32>() * 100.),
                rotation: vec3(
                    rng.gen::<f32>() * 2.,
                    rng.gen::<f32>() * 2.,
                    rng.gen::<f32>() * 2.,
                ),
                scale: Vec3::splat(rng.gen::<f32>()),
            },
            motion: Motion::Still,
            expiry: Expiry::Never,
            visual: Visual { color: self.color },
        })
    }
}

pub struct Spinners<H> {
    spinners: LifecycleManager<H>,
    spray: LifecycleManager<H>,
    spinner_factory: SpinnerFactory,
    spray_factory: SprayFactory,
    rng: Pcg64Mcg,
}

impl<H: Copy + Eq + std::fmt::Debug> Spinners<H> {
    pub fn new(seed: u64) -> Self {
        Self {
            spinners: LifecycleManager::seeded(OnExpire::Drop, seed.wrapping_add(1)),
            spray: LifecycleManager::seeded(OnExpire::Drop, seed.wrapping_add(2)),
            spinner_factory: SpinnerFactory {
                orientation: Vec3::ZERO,
                parts: Vec::new(),
            },
            spray_factory: SprayFactory { color: Vec3::ONE },
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }
}

impl<R: SceneRenderer> Sketch<R> for Spinners<R::Handle> {
    fn name(&self) -> &'static str {
        "spinners"
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
        for _ in 0..SPINNER_COUNT {
            self.spinner_factory.orientation = vec3(
                self.rng.gen::<f32>() * PI,
                self.rng.gen::<f32>() * PI,
                self.rng.gen::<f32>() * PI,
            );
            self.spinner_factory.parts = std::iter::once(Part::Wheel)
                .chain((0..TRAIL_SEGMENTS).map(Part::Trail))
                .collect();
            let count = self.spinner_factory.parts.len();
            self.spinners
                .spawn(renderer, &mut self.spinner_factory, count)?;
        }

        let palette = pick_palette(&mut self.rng);
        self.spray_factory.color = pick_color(palette, &mut self.rng);
        let count = self.rng.gen_range(1..=MAX_SHARDS);
        self.spray.spawn(renderer, &mut self.spray_factory, count)?;
        Ok(())
    }

    fn on_frame(&mut self, renderer: &mut R, frame: Frame) -> Result<()> {
        self.spinners
            .advance(renderer, &mut self.spinner_factory, frame)?;
        self.spray.advance(renderer, &mut self.spray_factory, frame)?;
        Ok(())
    }

    fn on_unload(&mut self, renderer: &mut R) -> Result<()> {
        teardown_all(renderer, &mut [&mut self.spinners, &mut self.spray])
    }
}
