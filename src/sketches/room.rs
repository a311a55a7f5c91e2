//! A red cube turning slowly inside the wireframe of a 5 m room.

use glam::{vec3, Vec3};
use rand::RngCore;

use crate::{
    entity::{hex_color, Camera, Transform, Visual},
    error::Result,
    lifecycle::{Expiry, Factory, LifecycleManager, Motion, ObjectSpec, OnExpire},
    scene::{Frame, SceneRenderer, Sketch},
    sketches::teardown_all,
};

const ROOM_SIZE: f32 = 5.;
const FLOOR_DIVISIONS: usize = 10;
const LINE_WIDTH: f32 = 0.02;

/// Edges of the room box plus a grid on the floor, each as a thin beam.
fn room_beams() -> Vec<(Vec3, Vec3)> {
    let h = ROOM_SIZE / 2.;
    let mut beams = Vec::new();

    for &x in &[-h, h] {
        for &z in &[-h, h] {
            beams.push((vec3(x, h, z), vec3(LINE_WIDTH, ROOM_SIZE, LINE_WIDTH)));
        }
    }
    for &y in &[0., ROOM_SIZE] {
        for &s in &[-h, h] {
            beams.push((vec3(0., y, s), vec3(ROOM_SIZE, LINE_WIDTH, LINE_WIDTH)));
            beams.push((vec3(s, y, 0.), vec3(LINE_WIDTH, LINE_WIDTH, ROOM_SIZE)));
        }
    }

    let step = ROOM_SIZE / FLOOR_DIVISIONS as f32;
    for i in 1..FLOOR_DIVISIONS {
        let d = -h + step * i as f32;
        beams.push((vec3(d, 0., 0.), vec3(LINE_WIDTH, LINE_WIDTH, ROOM_SIZE)));
        beams.push((vec3(0., 0., d), vec3(ROOM_SIZE, LINE_WIDTH, LINE_WIDTH)));
    }
    beams
}

struct BeamFactory {
    beams: Vec<(Vec3, Vec3)>,
}

impl Factory for BeamFactory {
    fn build(&mut self, _rng: &mut dyn RngCore, _time: f32) -> Result<ObjectSpec> {
        let (position, scale) = self.beams.pop().unwrap_or((Vec3::ZERO, Vec3::ZERO));
        Ok(ObjectSpec {
            transform: Transform {
                position,
                scale,
                ..Default::default()
            },
            visual: Visual::from_hex(0x134d79),
            ..Default::default()
        })
    }
}

struct CubeFactory;

impl Factory for CubeFactory {
    fn build(&mut self, _rng: &mut dyn RngCore, _time: f32) -> Result<ObjectSpec> {
        Ok(ObjectSpec {
            transform: Transform {
                position: vec3(0., 1., 0.),
                ..Default::default()
            },
            motion: Motion::spin(vec3(0., 0.01, 0.)),
            expiry: Expiry::Never,
            visual: Visual::from_hex(0xff0044),
        })
    }
}

pub struct Room<H> {
    cube: LifecycleManager<H>,
    walls: LifecycleManager<H>,
}

impl<H: Copy + Eq + std::fmt::Debug> Room<H> {
    pub fn new(seed: u64) -> Self {
        Self {
            cube: LifecycleManager::seeded(OnExpire::Drop, seed.wrapping_add(1)),
            walls: LifecycleManager::seeded(OnExpire::Drop, seed.wrapping_add(2)),
        }
    }
}

impl<R: SceneRenderer> Sketch<R> for Room<R::Handle> {
    fn name(&self) -> &'static str {
        "room"
    }

    fn camera(&self) -> Camera {
        Camera {
            position: vec3(1.5, 1.8, 1.5),
            target: vec3(0., 1., 0.),
            fov: 70.,
            near: 0.1,
            far: 1000.,
            ..Default::default()
        }
    }

    fn background(&self) -> Vec3 {
        hex_color(0x082337)
    }

    fn on_load(&mut self, renderer: &mut R) -> Result<()> {
        let mut beams = BeamFactory {
            beams: room_beams(),
        };
        let count = beams.beams.len();
        self.walls.spawn(renderer, &mut beams, count)?;
        self.cube.spawn(renderer, &mut CubeFactory, 1)?;
        Ok(())
    }

    fn on_frame(&mut self, renderer: &mut R, frame: Frame) -> Result<()> {
        self.cube.advance(renderer, &mut CubeFactory, frame)?;
        Ok(())
    }

    fn on_unload(&mut self, renderer: &mut R) -> Result<()> {
        teardown_all(renderer, &mut [&mut self.cube, &mut self.walls])
    }
}
