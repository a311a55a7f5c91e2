//! A fleet of five ships holding formation while streaks of starlight pour
//! past. Stars are recycled one for one, so the field never thins out.

use glam::{vec3, Vec3};
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::{
    entity::{hex_color, Camera, Transform, Visual},
    error::Result,
    lifecycle::{
        Axis, Expiry, Factory, LifecycleManager, Motion, ObjectSpec, OnExpire, Range3,
        SpawnConfig,
    },
    scene::{Frame, SceneRenderer, Sketch},
    sketches::teardown_all,
};

const STAR_COUNT: usize = 100;
const STAR_LENGTH: f32 = 40.;
const STAR_SPEED: f32 = 30.;
const STAR_BOUNDS: [f32; 3] = [200., 200., 1000.];
const STAR_START_OFFSET: f32 = 1000.;

const SHIP_COUNT: usize = 5;
const SHIP_X_SPACING: f32 = 3.;
const SHIP_Y_SPACING: f32 = 1.8;
const SHIP_Z_SPACING: f32 = 1.5;
const BLAST_COUNT: usize = 10;

fn star_config(start_offset: f32) -> SpawnConfig {
    let bounds = Vec3::from(STAR_BOUNDS);
    SpawnConfig {
        position_range: Range3::symmetric(bounds + vec3(0., 0., start_offset)),
        scale_range: Range3::fixed(vec3(0.2, 0.2, STAR_LENGTH * 2.)),
        motion: Motion::translate(vec3(0., 0., STAR_SPEED)),
        expiry: Expiry::above(Axis::Z, bounds.z),
        visual: Visual::from_hex(0xffffff),
        ..Default::default()
    }
}

/// One piece of a ship, positioned relative to the ship's origin.
#[derive(Debug, Copy, Clone)]
struct ShipPart {
    offset: Vec3,
    scale: Vec3,
    color: u32,
}

fn ship_parts() -> Vec<ShipPart> {
    let mut parts = vec![
        ShipPart {
            offset: Vec3::ZERO,
            scale: vec3(3., 0.5, 2.5),
            color: 0x0da9ff,
        },
        ShipPart {
            offset: vec3(0., 0.07, -0.1),
            scale: vec3(0.5, 0.3, 0.6),
            color: 0x393939,
        },
    ];
    for side in [-1., 1.] {
        parts.push(ShipPart {
            offset: vec3(side * 0.4, 0.2, 1.1),
            scale: vec3(0.4, 0.4, 1.),
            color: 0x690078,
        });
    }
    for i in 0..BLAST_COUNT {
        let i = i as f32;
        parts.push(ShipPart {
            offset: vec3(0., 0.2, 1.6 + (i * 0.8).exp() * 0.1),
            scale: vec3(0.4, 0.4, 0.4 * (2. + (i * 0.4).exp())),
            color: 0xfbe89a,
        });
    }
    parts
}

/// Builds every part of one ship. All parts share the ship's sway, so the
/// ship moves as a unit.
struct ShipFactory {
    origin: Vec3,
    index: usize,
    parts: Vec<ShipPart>,
}

impl Factory for ShipFactory {
    fn build(&mut self, _rng: &mut dyn RngCore, _time: f32) -> Result<ObjectSpec> {
        let part = self.parts.pop().unwrap_or(ShipPart {
            offset: Vec3::ZERO,
            scale: Vec3::ONE,
            color: 0xffffff,
        });
        let k = (self.index + 1) as f32;
        Ok(ObjectSpec {
            transform: Transform {
                position: self.origin + part.offset,
                scale: part.scale,
                ..Default::default()
            },
            motion: Motion::Oscillate {
                translation: vec3(1. / 250., 1. / 200., 1. / 200.),
                rotation: vec3(0., 0., 1. / 1500.),
                frequency: k,
                phase: 0.,
            },
            expiry: Expiry::Never,
            visual: Visual::from_hex(part.color),
        })
    }
}

fn ship_origin(index: usize, rng: &mut dyn RngCore) -> Vec3 {
    let fleet_width = SHIP_COUNT as f32 * SHIP_X_SPACING;
    let i = index as f32;
    let x = i * (fleet_width / SHIP_COUNT as f32) - fleet_width / 2.;
    let z = if i > SHIP_COUNT as f32 / 2. {
        (SHIP_COUNT as f32 - i) * -SHIP_Z_SPACING
    } else {
        -i * SHIP_Z_SPACING
    };
    let y = rng.gen_range(-SHIP_Y_SPACING..=SHIP_Y_SPACING);
    vec3(x, y, z)
}

pub struct Fleet<H> {
    stars: LifecycleManager<H>,
    ships: LifecycleManager<H>,
    respawn_stars: SpawnConfig,
    ship_factory: ShipFactory,
    rng: Pcg64Mcg,
}

impl<H: Copy + Eq + std::fmt::Debug> Fleet<H> {
    pub fn new(seed: u64) -> Self {
        Self {
            stars: LifecycleManager::seeded(OnExpire::Recycle, seed.wrapping_add(1)),
            ships: LifecycleManager::seeded(OnExpire::Drop, seed.wrapping_add(2)),
            respawn_stars: star_config(STAR_START_OFFSET),
            ship_factory: ShipFactory {
                origin: Vec3::ZERO,
                index: 0,
                parts: Vec::new(),
            },
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }
}

impl<R: SceneRenderer> Sketch<R> for Fleet<R::Handle> {
    fn name(&self) -> &'static str {
        "fleet"
    }

    fn camera(&self) -> Camera {
        Camera {
            position: vec3(-8., 2., -7.),
            target: Vec3::ZERO,
            fov: 70.,
            near: 0.1,
            far: 2000.,
            ..Default::default()
        }
    }

    fn background(&self) -> Vec3 {
        hex_color(0x181f4b) * 0.5
    }

    fn on_load(&mut self, renderer: &mut R) -> Result<()> {
        self.stars
            .spawn(renderer, &mut star_config(0.), STAR_COUNT)?;

        for index in 0..SHIP_COUNT {
            self.ship_factory.origin = ship_origin(index, &mut self.rng);
            self.ship_factory.index = index;
            self.ship_factory.parts = ship_parts();
            let count = self.ship_factory.parts.len();
            self.ships.spawn(renderer, &mut self.ship_factory, count)?;
        }
        Ok(())
    }

    fn on_frame(&mut self, renderer: &mut R, frame: Frame) -> Result<()> {
        self.stars.advance(renderer, &mut self.respawn_stars, frame)?;
        self.ships.advance(renderer, &mut self.ship_factory, frame)?;
        Ok(())
    }

    fn on_unload(&mut self, renderer: &mut R) -> Result<()> {
        teardown_all(renderer, &mut [&mut self.stars, &mut self.ships])
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
    fn star_field_population_is_constant() {
        let mut list = DrawList::with_capacity(1024);
        let mut sketch: Fleet<DrawableHandle> = Fleet::new(8);
        sketch.on_load(&mut list).unwrap();
        assert_eq!(sketch.stars.len(), STAR_COUNT);

        for start in (0..1000).step_by(50) {
            run_frames(&mut sketch, &mut list, start, 50);
            assert_eq!(sketch.stars.len(), STAR_COUNT);
        }
        assert!(sketch.stars.spawned_total() > STAR_COUNT as u64);
        assert_eq!(list.len(), sketch.stars.len() + sketch.ships.len());
    }

    #[test]
    fn formation_matches_spacing() {
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        let origins: Vec<_> = (0..SHIP_COUNT).map(|i| ship_origin(i, &mut rng)).collect();
        let xs: Vec<_> = origins.iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![-7.5, -4.5, -1.5, 1.5, 4.5]);
        let zs: Vec<_> = origins.iter().map(|o| o.z).collect();
        assert_eq!(zs, vec![0., -1.5, -3., -3., -1.5]);
        assert!(origins.iter().all(|o| o.y.abs() <= SHIP_Y_SPACING));
    }

    #[test]
    fn ships_sway_but_stay_near_formation() {
        let mut list = DrawList::with_capacity(1024);
        let mut sketch: Fleet<DrawableHandle> = Fleet::new(1);
        sketch.on_load(&mut list).unwrap();
        let before: Vec<_> = sketch.ships.live().iter().map(|o| o.transform().position).collect();

        run_frames(&mut sketch, &mut list, 0, 600);
        let moved = sketch
            .ships
            .live()
            .iter()
            .zip(&before)
            .map(|(o, b)| o.transform().position.distance(*b))
            .fold(0f32, f32::max);
        assert!(moved > 0.);
        assert!(moved < 5.);
    }
}
