//! Eased interpolation between transforms.
//!
//! A [`Tween`] moves a `Vec3` from one value to another over a duration after
//! an optional delay. A [`TweenTrack`] chains tweens back to back, one chain
//! for position and one for rotation, and is sampled by the age of the object
//! it drives.

use glam::Vec3;

use crate::error::{Error, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
}

impl Default for Easing {
    fn default() -> Self {
        Self::Linear
    }
}

impl Easing {
    /// Maps linear progress `k` in `0..=1` to eased progress.
    pub fn apply(self, k: f32) -> f32 {
        let k = k.clamp(0., 1.);
        match self {
            Self::Linear => k,
            Self::QuadraticIn => k * k,
            Self::QuadraticOut => k * (2. - k),
            Self::QuadraticInOut => {
                let k = k * 2.;
                if k < 1. {
                    0.5 * k * k
                } else {
                    let k = k - 1.;
                    -0.5 * (k * (k - 2.) - 1.)
                }
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween {
    pub from: Vec3,
    pub to: Vec3,
    pub delay: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: Vec3, to: Vec3, duration: f32) -> Self {
        Self {
            from,
            to,
            delay: 0.,
            duration,
            easing: Easing::Linear,
        }
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn total_duration(&self) -> f32 {
        self.delay + self.duration
    }

    pub fn sample(&self, elapsed: f32) -> Vec3 {
        let t = elapsed - self.delay;
        if t <= 0. {
            return self.from;
        }
        if self.duration <= 0. || t >= self.duration {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.apply(t / self.duration))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.from.is_finite() && self.to.is_finite()) {
            return Err(Error::configuration("tween endpoints must be finite"));
        }
        if !(self.delay.is_finite() && self.delay >= 0.) {
            return Err(Error::configuration(format!(
                "tween delay must be finite and non-negative, got {}",
                self.delay
            )));
        }
        if !(self.duration.is_finite() && self.duration >= 0.) {
            return Err(Error::configuration(format!(
                "tween duration must be finite and non-negative, got {}",
                self.duration
            )));
        }
        Ok(())
    }
}

fn sample_chain(chain: &[Tween], age: f32) -> Option<Vec3> {
    let mut start = 0.;
    let mut last = None;
    for tween in chain {
        let end = start + tween.total_duration();
        if age < end {
            return Some(tween.sample(age - start));
        }
        last = Some(tween.to);
        start = end;
    }
    last
}

fn chain_duration(chain: &[Tween]) -> f32 {
    chain.iter().map(Tween::total_duration).sum()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TweenTrack {
    pub position: Vec<Tween>,
    pub rotation: Vec<Tween>,
}

impl TweenTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_move(mut self, tween: Tween) -> Self {
        self.position.push(tween);
        self
    }

    pub fn then_rotate(mut self, tween: Tween) -> Self {
        self.rotation.push(tween);
        self
    }

    /// Position and rotation at `age` seconds. A chain with no tweens yields
    /// `None` for its half.
    pub fn sample(&self, age: f32) -> (Option<Vec3>, Option<Vec3>) {
        (
            sample_chain(&self.position, age),
            sample_chain(&self.rotation, age),
        )
    }

    pub fn total_duration(&self) -> f32 {
        chain_duration(&self.position).max(chain_duration(&self.rotation))
    }

    pub fn validate(&self) -> Result<()> {
        self.position
            .iter()
            .chain(self.rotation.iter())
            .try_for_each(Tween::validate)
    }
}
