//! Gold rings and tumbling shards rushing at a slowly rolling camera.

use glam::{vec3, Vec3};
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::{
    entity::{hex_color, Camera, Transform, Visual},
    error::Result,
    lifecycle::{Axis, Expiry, Factory, LifecycleManager, Motion, ObjectSpec, OnExpire},
    scene::{Frame, SceneRenderer, Sketch},
    sketches::{
        palette::{pick_color, pick_palette, Palette},
        teardown_all,
    },
};

const START_DEPTH: f32 = 30.;
const END_DEPTH: f32 = -5.;
const SPAWN_INTERVAL: f32 = 0.8;
const MAX_BURST: usize = 20;

struct RingFactory;

impl Factory for RingFactory {
    fn build(&mut self, _rng: &mut dyn RngCore, time: f32) -> Result<ObjectSpec> {
        let offset = time.sin() * 0.3;
        Ok(ObjectSpec {
            transform: Transform {
                position: vec3(offset, offset, START_DEPTH),
                rotation: vec3(90., 0., 0.),
                scale: vec3(2., 0.3, 2.),
            },
            motion: Motion::translate(vec3(0., 0., -0.05)),
            expiry: Expiry::below(Axis::Z, END_DEPTH),
            visual: Visual::from_hex(0xfbd600),
        })
    }
}

struct ShardFactory {
    color: Vec3,
}

impl Factory for ShardFactory {
    fn build(&mut self, rng: &mut dyn RngCore, _time: f32) -> Result<ObjectSpec> {
        let direction = vec3(
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() + 5.,
        )
        .normalize();
        let position = direction * (10. + rng.gen::<f32>() * 10.);
        let scale = Vec3::splat(rng.gen::<f32>() * 0.1);
        let rotation = vec3(
            rng.gen::<f32>() * 2.,
            rng.gen::<f32>() * 2.,
            rng.gen::<f32>() * 2.,
        );

        Ok(ObjectSpec {
            transform: Transform {
                position,
                rotation,
                scale,
            },
            motion: Motion::PerTick {
                translation: vec3(0., 0., -0.02),
                rotation: vec3(0.01, 0.02, 0.),
            },
            expiry: Expiry::below(Axis::Z, END_DEPTH),
            visual: Visual { color: self.color },
        })
    }
}

pub struct Rings<H> {
    rings: LifecycleManager<H>,
    shards: LifecycleManager<H>,
    ring_factory: RingFactory,
    shard_factory: ShardFactory,
    palette: &'static Palette,
    rng: Pcg64Mcg,
    roll: f32,
}

impl<H: Copy + Eq + std::fmt::Debug> Rings<H> {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let palette = pick_palette(&mut rng);
        Self {
            rings: LifecycleManager::seeded(OnExpire::Drop, seed.wrapping_add(1)),
            shards: LifecycleManager::seeded(OnExpire::Drop, seed.wrapping_add(2)),
            ring_factory: RingFactory,
            shard_factory: ShardFactory {
                color: Vec3::ONE,
            },
            palette,
            rng,
            roll: 0.,
        }
    }

    fn burst<R>(&mut self, renderer: &mut R) -> Result<usize>
    where
        R: SceneRenderer<Handle = H>,
    {
        self.shard_factory.color = pick_color(self.palette, &mut self.rng);
        let count = self.rng.gen_range(1..=MAX_BURST);
        self.shards.spawn(renderer, &mut self.shard_factory, count)
    }
}

impl<R: SceneRenderer> Sketch<R> for Rings<R::Handle> {
    fn name(&self) -> &'static str {
        "rings"
    }

    fn camera(&self) -> Camera {
        Camera {
            position: vec3(0., 0., -5.),
            target: vec3(0., 0., -1.),
            roll: self.roll,
            fov: 50.,
            near: 0.01,
            far: 100.,
            ..Default::default()
        }
    }

    fn background(&self) -> Vec3 {
        hex_color(0x8d0a55)
    }

    fn on_load(&mut self, renderer: &mut R) -> Result<()> {
        self.roll = 0.;
        self.burst(renderer)?;
        Ok(())
    }

    fn on_frame(&mut self, renderer: &mut R, frame: Frame) -> Result<()> {
        self.rings.advance(renderer, &mut self.ring_factory, frame)?;
        self.shards.advance(renderer, &mut self.shard_factory, frame)?;

        let spawned = self.rings.maybe_spawn(
            renderer,
            &mut self.ring_factory,
            frame.delta,
            SPAWN_INTERVAL,
            1,
        )?;
        if spawned > 0 {
            self.burst(renderer)?;
        }

        self.roll += 0.001;
        Ok(())
    }

    fn on_unload(&mut self, renderer: &mut R) -> Result<()> {
        teardown_all(renderer, &mut [&mut self.rings, &mut self.shards])
    }
}
