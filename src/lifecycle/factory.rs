use glam::{vec3, Vec3};
use rand::{Rng, RngCore};

use crate::{
    entity::{Transform, Visual},
    error::{Error, Result},
    lifecycle::object::{Expiry, Motion, ObjectSpec},
};

/// Builds the spec for one new live object.
pub trait Factory {
    fn build(&mut self, rng: &mut dyn RngCore, time: f32) -> Result<ObjectSpec>;
}

impl<F> Factory for F
where
    F: FnMut(&mut dyn RngCore, f32) -> Result<ObjectSpec>,
{
    fn build(&mut self, rng: &mut dyn RngCore, time: f32) -> Result<ObjectSpec> {
        self(rng, time)
    }
}

/// Inclusive per-axis range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Range3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Range3 {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn fixed(v: Vec3) -> Self {
        Self { min: v, max: v }
    }

    pub fn symmetric(extent: Vec3) -> Self {
        Self {
            min: -extent,
            max: extent,
        }
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(Error::configuration(format!(
                "{} must be finite: {:?}",
                name, self
            )));
        }
        if !self.min.cmple(self.max).all() {
            return Err(Error::configuration(format!(
                "{} has min > max: {:?}",
                name, self
            )));
        }
        if !(self.max - self.min).is_finite() {
            return Err(Error::configuration(format!(
                "{} spans more than f32 can represent: {:?}",
                name, self
            )));
        }
        Ok(())
    }

    /// Callers must have validated the range.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        vec3(
            rng.gen_range(self.min.x..=self.max.x),
            rng.gen_range(self.min.y..=self.max.y),
            rng.gen_range(self.min.z..=self.max.z),
        )
    }
}

impl Default for Range3 {
    fn default() -> Self {
        Self::fixed(Vec3::ZERO)
    }
}

/// Randomized spawn parameters. Sampling is a pure function of the config and
/// the RNG, so a seeded RNG reproduces the same objects.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnConfig {
    pub position_range: Range3,
    pub rotation_range: Range3,
    pub scale_range: Range3,
    /// Use the x component of `scale_range` for all three axes.
    pub uniform_scale: bool,
    pub motion: Motion,
    pub expiry: Expiry,
    pub visual: Visual,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            position_range: Range3::default(),
            rotation_range: Range3::default(),
            scale_range: Range3::fixed(Vec3::ONE),
            uniform_scale: false,
            motion: Motion::Still,
            expiry: Expiry::Never,
            visual: Visual::default(),
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<()> {
        self.position_range.validate("position range")?;
        self.rotation_range.validate("rotation range")?;
        self.scale_range.validate("scale range")?;
        self.motion.validate()?;
        self.expiry.validate()
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> Result<ObjectSpec> {
        self.validate()?;

        let position = self.position_range.sample(rng);
        let rotation = self.rotation_range.sample(rng);
        let scale = if self.uniform_scale {
            Vec3::splat(rng.gen_range(self.scale_range.min.x..=self.scale_range.max.x))
        } else {
            self.scale_range.sample(rng)
        };

        Ok(ObjectSpec {
            transform: Transform {
                position,
                rotation,
                scale,
            },
            motion: self.motion.clone(),
            expiry: self.expiry,
            visual: self.visual,
        })
    }
}

impl Factory for SpawnConfig {
    fn build(&mut self, rng: &mut dyn RngCore, _time: f32) -> Result<ObjectSpec> {
        self.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn config() -> SpawnConfig {
        SpawnConfig {
            position_range: Range3::symmetric(vec3(200., 200., 1000.)),
            scale_range: Range3::new(Vec3::splat(0.1), Vec3::splat(1.)),
            uniform_scale: true,
            ..Default::default()
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let config = config();
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for _ in 0..500 {
            let spec = config.sample(&mut rng).unwrap();
            let p = spec.transform.position;
            assert!(p.abs().cmple(vec3(200., 200., 1000.)).all());
            let s = spec.transform.scale;
            assert_eq!(s.x, s.y);
            assert_eq!(s.y, s.z);
            assert!((0.1..=1.).contains(&s.x));
        }
    }

    #[test]
    fn seeded_rng_reproduces_objects() {
        let config = config();
        let mut a = Pcg64Mcg::seed_from_u64(42);
        let mut b = Pcg64Mcg::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(config.sample(&mut a).unwrap(), config.sample(&mut b).unwrap());
        }
    }

    #[test]
    fn inverted_range_is_a_configuration_error() {
        let config = SpawnConfig {
            position_range: Range3::new(Vec3::ONE, Vec3::ZERO),
            ..Default::default()
        };
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        assert!(matches!(config.sample(&mut rng), Err(Error::Configuration(_))));
    }

    #[test]
    fn range_wider_than_f32_is_rejected() {
        let range = Range3::new(Vec3::splat(-f32::MAX), Vec3::splat(f32::MAX));
        assert!(matches!(range.validate("position"), Err(Error::Configuration(_))));

        let config = SpawnConfig {
            position_range: range,
            ..Default::default()
        };
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        assert!(matches!(config.sample(&mut rng), Err(Error::Configuration(_))));
    }

    #[test]
    fn degenerate_range_is_allowed() {
        let config = SpawnConfig {
            position_range: Range3::fixed(vec3(0., 0., 30.)),
            ..Default::default()
        };
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        let spec = config.sample(&mut rng).unwrap();
        assert_eq!(spec.transform.position, vec3(0., 0., 30.));
    }
}
