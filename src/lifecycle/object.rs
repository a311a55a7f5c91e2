use glam::Vec3;

use crate::{
    entity::{Transform, Visual},
    error::{Error, Result},
    tween::TweenTrack,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn of(self, v: Vec3) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Crossing {
    /// Expired once the coordinate is at or below the bound.
    Below,
    /// Expired once the coordinate is at or above the bound.
    Above,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Expiry {
    Never,
    Bound {
        axis: Axis,
        bound: f32,
        crossing: Crossing,
    },
    /// Seconds since spawn.
    MaxAge(f32),
}

impl Default for Expiry {
    fn default() -> Self {
        Self::Never
    }
}

impl Expiry {
    pub fn below(axis: Axis, bound: f32) -> Self {
        Self::Bound {
            axis,
            bound,
            crossing: Crossing::Below,
        }
    }

    pub fn above(axis: Axis, bound: f32) -> Self {
        Self::Bound {
            axis,
            bound,
            crossing: Crossing::Above,
        }
    }

    pub fn is_expired(&self, transform: &Transform, age: f32) -> bool {
        match *self {
            Self::Never => false,
            Self::Bound {
                axis,
                bound,
                crossing: Crossing::Below,
            } => axis.of(transform.position) <= bound,
            Self::Bound {
                axis,
                bound,
                crossing: Crossing::Above,
            } => axis.of(transform.position) >= bound,
            Self::MaxAge(max_age) => age >= max_age,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Never => Ok(()),
            Self::Bound { bound, .. } if bound.is_finite() => Ok(()),
            Self::Bound { bound, .. } => Err(Error::configuration(format!(
                "expiry bound must be finite, got {}",
                bound
            ))),
            Self::MaxAge(max_age) if max_age.is_finite() && max_age >= 0. => Ok(()),
            Self::MaxAge(max_age) => Err(Error::configuration(format!(
                "max age must be finite and non-negative, got {}",
                max_age
            ))),
        }
    }
}

/// How a live object's transform changes each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    Still,
    /// Fixed delta added once per tick.
    PerTick { translation: Vec3, rotation: Vec3 },
    /// Per-tick delta scaled by `sin(frequency * time + phase)` of the global
    /// clock, so the object sways around where it spawned.
    Oscillate {
        translation: Vec3,
        rotation: Vec3,
        frequency: f32,
        phase: f32,
    },
    /// Rigid rotation about `pivot`: the rotation advances by `spin` each
    /// tick and the object sits at `pivot + rotation * offset`.
    Orbit { pivot: Vec3, offset: Vec3, spin: Vec3 },
    /// Absolute placement along a tween track, sampled by age. `offset` is the
    /// object's place within a rigid group whose origin follows the track.
    Tween { track: TweenTrack, offset: Vec3 },
}

impl Default for Motion {
    fn default() -> Self {
        Self::Still
    }
}

impl Motion {
    pub fn translate(translation: Vec3) -> Self {
        Self::PerTick {
            translation,
            rotation: Vec3::ZERO,
        }
    }

    pub fn spin(rotation: Vec3) -> Self {
        Self::PerTick {
            translation: Vec3::ZERO,
            rotation,
        }
    }

    pub fn apply(&self, transform: &mut Transform, time: f32, age: f32) {
        match self {
            Self::Still => (),
            Self::PerTick {
                translation,
                rotation,
            } => {
                transform.position += *translation;
                transform.rotation += *rotation;
            }
            Self::Oscillate {
                translation,
                rotation,
                frequency,
                phase,
            } => {
                let s = (frequency * time + phase).sin();
                transform.position += *translation * s;
                transform.rotation += *rotation * s;
            }
            Self::Orbit {
                pivot,
                offset,
                spin,
            } => {
                transform.rotation += *spin;
                transform.position = *pivot + transform.rotation_quat() * *offset;
            }
            Self::Tween { track, offset } => {
                let (position, rotation) = track.sample(age);
                if let Some(rotation) = rotation {
                    transform.rotation = rotation;
                }
                if let Some(position) = position {
                    transform.position = position + transform.rotation_quat() * *offset;
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let finite = match self {
            Self::Still => true,
            Self::PerTick {
                translation,
                rotation,
            } => translation.is_finite() && rotation.is_finite(),
            Self::Oscillate {
                translation,
                rotation,
                frequency,
                phase,
            } => {
                translation.is_finite()
                    && rotation.is_finite()
                    && frequency.is_finite()
                    && phase.is_finite()
            }
            Self::Orbit {
                pivot,
                offset,
                spin,
            } => pivot.is_finite() && offset.is_finite() && spin.is_finite(),
            Self::Tween { track, offset } => {
                if !offset.is_finite() {
                    return Err(Error::configuration("tween offset must be finite"));
                }
                return track.validate();
            }
        };
        if finite {
            Ok(())
        } else {
            Err(Error::configuration(format!("motion must be finite: {:?}", self)))
        }
    }
}

/// Everything needed to bring one live object into the scene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSpec {
    pub transform: Transform,
    pub motion: Motion,
    pub expiry: Expiry,
    pub visual: Visual,
}

impl ObjectSpec {
    pub fn validate(&self) -> Result<()> {
        if !self.transform.is_finite() {
            return Err(Error::configuration(format!(
                "spawn transform must be finite: {:?}",
                self.transform
            )));
        }
        if !self.visual.color.is_finite() {
            return Err(Error::configuration("visual color must be finite"));
        }
        self.motion.validate()?;
        self.expiry.validate()
    }
}

#[derive(Debug, Clone)]
pub struct LiveObject<H> {
    pub(super) id: ObjectId,
    pub(super) handle: H,
    pub(super) transform: Transform,
    pub(super) motion: Motion,
    pub(super) expiry: Expiry,
    pub(super) spawn_time: f32,
    pub(super) expired: bool,
}

impl<H: Copy> LiveObject<H> {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn handle(&self) -> H {
        self.handle
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn expiry(&self) -> &Expiry {
        &self.expiry
    }

    pub fn spawn_time(&self) -> f32 {
        self.spawn_time
    }

    pub fn age(&self, time: f32) -> f32 {
        time - self.spawn_time
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;
    use crate::tween::Tween;

    #[test]
    fn bound_crossing_is_inclusive() {
        let expiry = Expiry::below(Axis::Z, -5.);
        let at = |z| Transform {
            position: vec3(0., 0., z),
            ..Default::default()
        };
        assert!(!expiry.is_expired(&at(-4.9), 0.));
        assert!(expiry.is_expired(&at(-5.), 0.));

        let expiry = Expiry::above(Axis::Z, 1000.);
        assert!(!expiry.is_expired(&at(999.), 0.));
        assert!(expiry.is_expired(&at(1010.), 0.));
    }

    #[test]
    fn max_age_expires_on_age_only() {
        let expiry = Expiry::MaxAge(3.);
        assert!(!expiry.is_expired(&Transform::default(), 2.9));
        assert!(expiry.is_expired(&Transform::default(), 3.));
    }

    #[test]
    fn oscillation_follows_clock() {
        let motion = Motion::Oscillate {
            translation: vec3(2., 0., 0.),
            rotation: vec3(0., 0., 1.),
            frequency: 1.,
            phase: 0.,
        };
        let mut transform = Transform::default();
        motion.apply(&mut transform, std::f32::consts::FRAC_PI_2, 0.);
        assert_relative_eq!(transform.position.x, 2.);
        assert_relative_eq!(transform.rotation.z, 1.);

        motion.apply(&mut transform, 0., 0.);
        assert_relative_eq!(transform.position.x, 2.);
    }

    #[test]
    fn orbit_rotates_offset_about_pivot() {
        let motion = Motion::Orbit {
            pivot: vec3(0., 1., 0.),
            offset: vec3(45., 0., 0.),
            spin: vec3(0., 0., std::f32::consts::FRAC_PI_2),
        };
        let mut transform = Transform::default();
        motion.apply(&mut transform, 0., 0.);
        assert_relative_eq!(transform.position.x, 0., epsilon = 1e-4);
        assert_relative_eq!(transform.position.y, 46., epsilon = 1e-4);
        assert_relative_eq!(transform.rotation.z, std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn tween_places_group_members_rigidly() {
        let track = TweenTrack::new()
            .then_move(Tween::new(vec3(0., -100., 100.), Vec3::ZERO, 1.));
        let motion = Motion::Tween {
            track,
            offset: vec3(4., 0., 0.),
        };
        let mut transform = Transform::default();
        motion.apply(&mut transform, 0., 0.);
        assert_eq!(transform.position, vec3(4., -100., 100.));
        motion.apply(&mut transform, 0., 2.);
        assert_eq!(transform.position, vec3(4., 0., 0.));
    }

    #[test]
    fn non_finite_spec_is_rejected() {
        let spec = ObjectSpec {
            motion: Motion::translate(vec3(f32::NAN, 0., 0.)),
            ..Default::default()
        };
        assert!(matches!(spec.validate(), Err(Error::Configuration(_))));

        let spec = ObjectSpec {
            expiry: Expiry::MaxAge(-1.),
            ..Default::default()
        };
        assert!(matches!(spec.validate(), Err(Error::Configuration(_))));
    }
}
